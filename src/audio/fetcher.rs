//! HTTP retrieval of remote audio clips.

use crate::config::FetchSettings;
use crate::error::{BattlecryError, Result};
use std::time::Duration;
use tracing::{debug, instrument};

/// HTTP client wrapper with a per-request timeout.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Build a fetcher from settings.
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| BattlecryError::Config(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client })
    }

    /// Fetch raw bytes from a URL.
    ///
    /// A transport failure or a non-success status both map to a fetch
    /// error; callers treat them identically.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BattlecryError::Fetch(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BattlecryError::Fetch(format!(
                "unexpected status {status} for {url}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BattlecryError::Fetch(format!("reading body of {url} failed: {e}")))?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_a_fetch_error() {
        let fetcher = Fetcher::new(&FetchSettings {
            timeout_seconds: 1,
            ..FetchSettings::default()
        })
        .unwrap();

        let err = fetcher
            .fetch("http://127.0.0.1:1/no-such-clip.ogg")
            .await
            .unwrap_err();
        assert!(matches!(err, BattlecryError::Fetch(_)));
    }
}
