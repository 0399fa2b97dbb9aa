// SVG chart rendering for the dashboard sections
use crate::model::RenderError;
use chrono::NaiveDate;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;

type DrawResult = Result<(), Box<dyn Error + Send + Sync>>;

const LINE_COLOR: RGBColor = RGBColor(0x90, 0xCA, 0xF9);
const CHART_SIZE: (u32, u32) = (960, 480);
const FONT: &str = "sans-serif";

/// Samples of the plasma colormap, dark to bright.
const PLASMA: [RGBColor; 6] = [
    RGBColor(0x0D, 0x08, 0x87),
    RGBColor(0x6A, 0x00, 0xA8),
    RGBColor(0xB1, 0x2A, 0x90),
    RGBColor(0xE1, 0x64, 0x62),
    RGBColor(0xFC, 0xA6, 0x36),
    RGBColor(0xF0, 0xF9, 0x21),
];

fn palette(i: usize, n: usize) -> RGBColor {
    if n <= 1 {
        return PLASMA[0];
    }
    PLASMA[i * (PLASMA.len() - 1) / (n - 1)]
}

fn upper_bound(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

fn chart_error(e: Box<dyn Error + Send + Sync>) -> RenderError {
    RenderError::Chart(e.to_string())
}

/// Bar with a label and a height.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

impl Bar {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Line chart of one value per day, with a marker on every point.
pub fn line_chart(
    title: &str,
    y_desc: &str,
    points: &[(NaiveDate, f64)],
) -> Result<String, RenderError> {
    if points.is_empty() {
        return Err(RenderError::Chart(format!("`{title}` has no points")));
    }
    let mut svg = String::new();
    draw_line_chart(&mut svg, title, y_desc, points).map_err(chart_error)?;
    Ok(svg)
}

fn draw_line_chart(
    svg: &mut String,
    title: &str,
    y_desc: &str,
    points: &[(NaiveDate, f64)],
) -> DrawResult {
    let root = SVGBackend::with_string(svg, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let x_max = (points.len().max(2) - 1) as f64;
    let y_max = upper_bound(points.iter().map(|(_, v)| *v));
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)?;

    let date_label = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        points
            .get(idx as usize)
            .map(|(date, _)| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(points.len().clamp(2, 12))
        .x_label_formatter(&date_label)
        .y_desc(y_desc)
        .draw()?;

    let series: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, (_, v))| (i as f64, *v))
        .collect();
    chart.draw_series(LineSeries::new(series.iter().copied(), LINE_COLOR.stroke_width(2)))?;
    chart.draw_series(series.iter().map(|&p| Circle::new(p, 4, LINE_COLOR.filled())))?;

    root.present()?;
    Ok(())
}

/// Vertical bar chart; `value_labels` prints each height above its bar.
pub fn bar_chart(
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[Bar],
    value_labels: bool,
) -> Result<String, RenderError> {
    if bars.is_empty() {
        return Err(RenderError::Chart(format!("`{title}` has no bars")));
    }
    let mut svg = String::new();
    draw_bar_chart(&mut svg, title, x_desc, y_desc, bars, value_labels).map_err(chart_error)?;
    Ok(svg)
}

fn draw_bar_chart(
    svg: &mut String,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[Bar],
    value_labels: bool,
) -> DrawResult {
    let root = SVGBackend::with_string(svg, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = bars.len();
    let y_max = upper_bound(bars.iter().map(|b| b.value));
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d((0..n as i32).into_segmented(), 0f64..y_max)?;

    let bar_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => bars
            .get(*i as usize)
            .map(|b| b.label.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&bar_label)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        let i = i as i32;
        let mut rect = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), bar.value)],
            palette(i as usize, n).filled(),
        );
        rect.set_margin(0, 0, 6, 6);
        rect
    }))?;

    if value_labels {
        chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
            Text::new(
                format!("{}", bar.value),
                (SegmentValue::CenterOf(i as i32), bar.value),
                (FONT, 14)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Bottom)),
            )
        }))?;
    }

    root.present()?;
    Ok(())
}

/// Horizontal bar chart; the first bar is drawn at the top.
pub fn horizontal_bar_chart(title: &str, x_desc: &str, bars: &[Bar]) -> Result<String, RenderError> {
    if bars.is_empty() {
        return Err(RenderError::Chart(format!("`{title}` has no bars")));
    }
    let mut svg = String::new();
    draw_horizontal_bar_chart(&mut svg, title, x_desc, bars).map_err(chart_error)?;
    Ok(svg)
}

fn draw_horizontal_bar_chart(svg: &mut String, title: &str, x_desc: &str, bars: &[Bar]) -> DrawResult {
    let root = SVGBackend::with_string(svg, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = bars.len();
    let x_max = upper_bound(bars.iter().map(|b| b.value));
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(200)
        .build_cartesian_2d(0f64..x_max, (0..n as i32).into_segmented())?;

    // row 0 sits at the bottom of the axis
    let row = |i: usize| (n - 1 - i) as i32;
    let bar_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(r) if *r >= 0 && (*r as usize) < n => {
            bars[n - 1 - *r as usize].label.clone()
        }
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&bar_label)
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        let r = row(i);
        let mut rect = Rectangle::new(
            [(0.0, SegmentValue::Exact(r)), (bar.value, SegmentValue::Exact(r + 1))],
            palette(i, n).filled(),
        );
        rect.set_margin(4, 4, 0, 0);
        rect
    }))?;

    root.present()?;
    Ok(())
}
