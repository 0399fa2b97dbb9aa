// Render module: charts, customer map and the dashboard page.

pub mod charts;
pub mod map;
pub mod page;

pub use map::MapRenderer;
pub use page::{DashboardPage, write_page};
