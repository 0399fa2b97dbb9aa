use crate::model::SourceError;

/// Retrieves a raw resource (table or image) by URL or filesystem path.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, SourceError>;
}
