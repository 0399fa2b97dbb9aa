// Customer scatter over the background map image
use crate::config::MapExtent;
use crate::model::{GeoRecord, RenderError};
use crate::source::Fetcher;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::error::Error;
use std::io::Cursor;
use tracing::info;

const POINT_COLOR: RGBColor = RGBColor(0x1E, 0x88, 0xE5);
const POINT_OPACITY: f64 = 0.3;
const POINT_RADIUS: i32 = 2;

pub struct MapRenderer<'a> {
    locations: &'a [GeoRecord],
    extent: MapExtent,
}

impl<'a> MapRenderer<'a> {
    pub fn new(locations: &'a [GeoRecord], extent: MapExtent) -> Self {
        Self { locations, extent }
    }

    /// Fetches the background image and renders the scatter as PNG bytes.
    pub async fn render_from(
        &self,
        fetcher: &dyn Fetcher,
        image_location: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let background = fetcher.fetch(image_location).await?;
        self.render(&background)
    }

    /// Draws every location over `background` (any PNG/JPEG) and encodes the result as PNG.
    pub fn render(&self, background: &[u8]) -> Result<Vec<u8>, RenderError> {
        let canvas = image::load_from_memory(background)?.to_rgb8();
        let (width, height) = canvas.dimensions();
        let mut buffer = canvas.into_raw();

        let drawn = self
            .draw_points(&mut buffer, (width, height))
            .map_err(|e| RenderError::Chart(e.to_string()))?;
        info!(
            "Map drew {} of {} customer locations",
            drawn,
            self.locations.len()
        );

        let canvas = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| RenderError::Chart("map buffer size mismatch".to_string()))?;
        let mut png = Cursor::new(Vec::new());
        canvas.write_to(&mut png, ImageFormat::Png)?;
        Ok(png.into_inner())
    }

    fn contains(&self, loc: &GeoRecord) -> bool {
        (self.extent.lon_min..=self.extent.lon_max).contains(&loc.longitude)
            && (self.extent.lat_min..=self.extent.lat_max).contains(&loc.latitude)
    }

    fn draw_points(
        &self,
        buffer: &mut [u8],
        size: (u32, u32),
    ) -> Result<usize, Box<dyn Error + Send + Sync>> {
        let root = BitMapBackend::with_buffer(buffer, size).into_drawing_area();
        let mut chart = ChartBuilder::on(&root).build_cartesian_2d(
            self.extent.lon_min..self.extent.lon_max,
            self.extent.lat_min..self.extent.lat_max,
        )?;

        let style = POINT_COLOR.mix(POINT_OPACITY).filled();
        let visible: Vec<(f64, f64)> = self
            .locations
            .iter()
            .filter(|loc| self.contains(loc))
            .map(|loc| (loc.longitude, loc.latitude))
            .collect();
        chart.draw_series(visible.iter().map(|&p| Circle::new(p, POINT_RADIUS, style)))?;

        root.present()?;
        Ok(visible.len())
    }
}
