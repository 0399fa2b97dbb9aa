// Core structs: OrderRecord, GeoRecord, derived view rows, error types
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// One order line item, as loaded from the orders table.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub order_status: Option<String>,
    pub approved_at: Option<NaiveDateTime>,
    pub delivered_carrier_at: Option<NaiveDateTime>,
    pub delivered_customer_at: Option<NaiveDateTime>,
    pub estimated_delivery_at: Option<NaiveDateTime>,
    pub purchased_at: Option<NaiveDateTime>,
    pub shipping_limit_at: Option<NaiveDateTime>,
    pub payment_value: Option<f64>,
    pub product_category: Option<String>,
    pub review_score: Option<u8>,
    pub customer_state: String,
}

impl OrderRecord {
    /// Calendar day the order was approved on.
    pub fn approval_date(&self) -> Option<NaiveDate> {
        self.approved_at.map(|ts| ts.date())
    }

    /// Spend amount; a missing value counts as nothing spent.
    pub fn spend(&self) -> f64 {
        self.payment_value.unwrap_or(0.0)
    }
}

/// One customer location, unique by `customer_unique_id` after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRecord {
    pub customer_unique_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyOrders {
    pub date: NaiveDate,
    pub order_count: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySpend {
    pub date: NaiveDate,
    pub total_spend: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub product_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCount {
    pub score: u8,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCount {
    pub state: String,
    pub customer_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

/// Review score distribution, ascending by score.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewSummary {
    pub distribution: Vec<ScoreCount>,
    pub mode: Option<u8>,
}

/// Distinct customers per state, descending by count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateSummary {
    pub distribution: Vec<StateCount>,
    pub mode: Option<String>,
}

/// Rows per order status, descending by count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSummary {
    pub distribution: Vec<StatusCount>,
    pub mode: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("request to {0} timed out")]
    Timeout(String),
    #[error("{url} answered with status {status}")]
    InvalidResponse { url: String, status: u16 },
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column `{0}`")]
    MissingColumn(&'static str),
    #[error("line {line}: invalid timestamp `{value}` in column `{column}`")]
    InvalidTimestamp {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: invalid number `{value}` in column `{column}`")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no rows in the selected date range")]
    EmptyInput,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("chart drawing failed: {0}")]
    Chart(String),
    #[error("map image unavailable: {0}")]
    ImageFetch(#[from] SourceError),
    #[error("map image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("cannot write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures that abort startup.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to load {name}: {source}")]
    Source {
        name: &'static str,
        #[source]
        source: SourceError,
    },
    #[error("failed to parse {name}: {source}")]
    Parse {
        name: &'static str,
        #[source]
        source: ParserError,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}
