//! HTTP remote speaking the `/quotes` contract.

use super::{RemoteStore, TransportError};
use async_trait::async_trait;
use quotebook_engine::Collection;

/// Remote reached over HTTP.
///
/// - `GET {base}/quotes` returns the collection as a JSON array
/// - `PUT {base}/quotes` replaces it; any non-2xx status is a failure
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    quotes_url: String,
}

impl HttpRemote {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            quotes_url: format!("{}/quotes", base_url.trim_end_matches('/')),
        }
    }

    pub fn quotes_url(&self) -> &str {
        &self.quotes_url
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn fetch(&self) -> Result<Collection, TransportError> {
        let body = self
            .client
            .get(&self.quotes_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| TransportError::FetchFailed(e.to_string()))?
            .text()
            .await
            .map_err(|e| TransportError::FetchFailed(e.to_string()))?;

        Collection::from_json(&body).map_err(|e| TransportError::InvalidPayload(e.to_string()))
    }

    async fn publish(&self, quotes: &Collection) -> Result<(), TransportError> {
        self.client
            .put(&self.quotes_url)
            .json(quotes)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| TransportError::PublishFailed(e.to_string()))?;

        tracing::debug!(url = %self.quotes_url, count = quotes.len(), "Published quotes over HTTP");
        Ok(())
    }
}
