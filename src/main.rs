mod analyzer;
mod config;
mod filter;
mod model;
mod normalizer;
mod parser;
mod render;
mod source;
mod utils;

use analyzer::DataAnalyzer;
use config::{AppConfig, load_config};
use filter::DateRange;
use model::{DashboardError, GeoRecord, OrderRecord};
use normalizer::{dedup_customers, sort_by_approval};
use parser::{GeolocationParser, OrdersParser, TableParser};
use render::{DashboardPage, MapRenderer, write_page};
use source::{Fetcher, SourceFetcher};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};

const CONFIG_ENV: &str = "DASHBOARD_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.json";

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let config_path =
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match build_dashboard(&config).await {
        Ok(path) => {
            info!("Dashboard ready: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Dashboard build failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads both tables, applies the configured date window and writes the page.
async fn build_dashboard(config: &AppConfig) -> Result<PathBuf, DashboardError> {
    let fetcher = SourceFetcher::new(Duration::from_secs(config.request_timeout_seconds))
        .map_err(|source| DashboardError::Source {
            name: "HTTP client",
            source,
        })?;

    let (orders, locations) = load_tables(&fetcher, config).await?;

    let range = DateRange::resolve(&orders, config.start_date, config.end_date)?;
    let filtered = match range {
        Some(range) => {
            info!("Selected range: {}", range);
            range.apply(&orders)
        }
        None => {
            warn!("No approved orders in the table");
            Vec::new()
        }
    };
    info!("{} of {} order rows in range", filtered.len(), orders.len());

    let analysis = DataAnalyzer::new(&filtered).analyze_all();
    if analysis.is_empty() {
        warn!("No orders in the selected range, rendering empty state");
    } else {
        info!(
            "Views: {} days, {} categories, {} review scores, {} states",
            analysis.daily_orders.len(),
            analysis.items.len(),
            analysis.reviews.distribution.len(),
            analysis.states.distribution.len()
        );
    }

    info!("Rendering customer map...");
    let map = MapRenderer::new(&locations, config.map_extent)
        .render_from(&fetcher, &config.map_image_source)
        .await;
    if let Err(e) = &map {
        warn!("Customer map failed: {}", e);
    }

    let page = DashboardPage {
        config,
        range,
        analysis: &analysis,
        map,
    };
    let path = write_page(Path::new(&config.output_dir), &page.render())?;
    Ok(path)
}

/// Fetches and parses the orders and geolocation tables; any failure aborts startup.
async fn load_tables(
    fetcher: &dyn Fetcher,
    config: &AppConfig,
) -> Result<(Vec<OrderRecord>, Vec<GeoRecord>), DashboardError> {
    info!("Fetching source tables...");
    let (orders_raw, geo_raw) = futures::future::join(
        fetcher.fetch(&config.orders_source),
        fetcher.fetch(&config.geolocation_source),
    )
    .await;
    let orders_raw = orders_raw.map_err(|source| DashboardError::Source {
        name: "orders",
        source,
    })?;
    let geo_raw = geo_raw.map_err(|source| DashboardError::Source {
        name: "geolocation",
        source,
    })?;

    info!("Parsing source tables...");
    let mut orders = OrdersParser::new()
        .parse(&orders_raw)
        .map_err(|source| DashboardError::Parse {
            name: "orders",
            source,
        })?;
    let locations = GeolocationParser::new()
        .parse(&geo_raw)
        .map_err(|source| DashboardError::Parse {
            name: "geolocation",
            source,
        })?;

    sort_by_approval(&mut orders);
    let total_locations = locations.len();
    let locations = dedup_customers(locations);
    info!(
        "Loaded {} order rows and {} customer locations ({} duplicates dropped)",
        orders.len(),
        locations.len(),
        total_locations - locations.len()
    );

    Ok((orders, locations))
}
