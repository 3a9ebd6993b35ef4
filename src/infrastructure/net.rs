//! Remote value fetcher: one bounded GET against a plain-text IP-echo endpoint.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use crate::domain::error::FetchError;
use crate::infrastructure::config::FetcherConfig;

/// Fetcher for the current external value. One request per call, no retries -
/// retry policy belongs to the caller.
#[async_trait]
pub trait IpFetcher: Send + Sync {
    /// Fetch the current public address as trimmed plain text
    async fn fetch(&self) -> Result<String, FetchError>;
}

/// Shared fetcher handle for cloning into background tasks
pub type IpFetcherHandle = Arc<dyn IpFetcher>;

/// HTTP fetcher backed by a fixed IP-echo endpoint
pub struct HttpIpFetcher {
    client: Client,
    endpoint: String,
}

impl HttpIpFetcher {
    pub fn new(config: &FetcherConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }
}

#[async_trait]
impl IpFetcher for HttpIpFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Network(format!(
                "{} returned status {}",
                self.endpoint,
                response.status()
            )));
        }

        let body = response.text().await?;
        validate_body(&body)
    }
}

/// Reject empty or non-printable bodies so a misbehaving endpoint can never
/// replace a previously cached value with garbage.
pub fn validate_body(body: &str) -> Result<String, FetchError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(FetchError::InvalidResponse("empty body".to_string()));
    }
    if !trimmed.chars().all(|c| c.is_ascii_graphic()) {
        return Err(FetchError::InvalidResponse(format!(
            "non-printable body: {:?}",
            trimmed
        )));
    }
    Ok(trimmed.to_string())
}
