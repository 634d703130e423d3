//! HTTP download of track audio for analysis

use async_trait::async_trait;
use bytes::Bytes;
use pulse_core::{AudioFetcher, PulseError, Result};
use reqwest::Client;
use tracing::debug;

/// Fetches audio over HTTP with reqwest
///
/// Relative locators such as `/tracks/{id}/audio` are resolved against the
/// configured base URL.
#[derive(Debug, Clone)]
pub struct HttpAudioFetcher {
    http: Client,
    base_url: Option<String>,
}

impl HttpAudioFetcher {
    /// Create a fetcher for absolute locators only
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("PulsePlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PulseError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: None,
        })
    }

    /// Create a fetcher that resolves relative locators against `base_url`
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let mut fetcher = Self::new()?;
        fetcher.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        Ok(fetcher)
    }

    /// Absolute URL for a locator
    pub fn resolve(&self, url: &str) -> Result<String> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }

        match (&self.base_url, url.starts_with('/')) {
            (Some(base), true) => Ok(format!("{}{}", base, url)),
            (Some(base), false) => Ok(format!("{}/{}", base, url)),
            (None, _) => Err(PulseError::invalid_input(format!(
                "Relative audio locator without base URL: {}",
                url
            ))),
        }
    }
}

#[async_trait]
impl AudioFetcher for HttpAudioFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        let url = self.resolve(url)?;

        debug!(url = %url, "Fetching audio for analysis");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| PulseError::network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PulseError::network(format!(
                "Server returned {} for {}",
                status.as_u16(),
                url
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| PulseError::network(format!("Failed to read body: {}", e)))
    }
}
