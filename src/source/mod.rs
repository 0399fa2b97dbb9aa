// Source module: fetching of raw tables and images.

pub mod fetcher;
pub mod traits;

pub use fetcher::SourceFetcher;
pub use traits::Fetcher;
