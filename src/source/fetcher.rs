use crate::model::SourceError;
use crate::source::traits::Fetcher;

use reqwest::Client;
use std::time::Duration;
use tracing::info;

pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) EcommerceDashboard/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::HttpError(e.to_string()))?;

        Ok(Self { client })
    }

    fn is_remote(location: &str) -> bool {
        location.starts_with("http://") || location.starts_with("https://")
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(url.to_string())
            } else {
                SourceError::HttpError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::InvalidResponse {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::HttpError(e.to_string()))?;
        Ok(body.to_vec())
    }

    async fn fetch_local(&self, path: &str) -> Result<Vec<u8>, SourceError> {
        let path = path.strip_prefix("file://").unwrap_or(path);
        tokio::fs::read(path).await.map_err(|source| SourceError::Io {
            path: path.to_string(),
            source,
        })
    }
}

#[async_trait::async_trait]
impl Fetcher for SourceFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, SourceError> {
        let bytes = if Self::is_remote(location) {
            self.fetch_remote(location).await?
        } else {
            self.fetch_local(location).await?
        };
        info!("Fetched {} bytes from {}", bytes.len(), location);
        Ok(bytes)
    }
}
