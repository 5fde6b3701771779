//! HTTP client that returns raw page bodies.

use super::{FetchConfig, retry_with_backoff};
use crate::error::{DataError, Result};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue};
use tracing::debug;

/// Fetcher with per-attempt deadline, retry and exponential backoff.
///
/// Holds no state between calls other than the connection pool.
#[derive(Clone)]
pub struct ResilientFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl ResilientFetcher {
    /// Create a fetcher with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(FetchConfig::default())
    }

    /// Create a fetcher with custom settings.
    ///
    /// # Example
    /// ```no_run
    /// use karachi_data::fetch::{FetchConfig, ResilientFetcher};
    /// use std::time::Duration;
    ///
    /// # async fn example() -> karachi_data::Result<()> {
    /// let config = FetchConfig::default().with_timeout(Duration::from_secs(5));
    /// let fetcher = ResilientFetcher::with_config(config)?;
    /// let body = fetcher.fetch("https://dps.psx.com.pk/indices/KSE100").await?;
    /// println!("{} bytes", body.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_config(config: FetchConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/html, */*"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self { client, config })
    }

    /// Settings in use.
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET `url` and return the body as text.
    ///
    /// Network errors, timeouts and non-2xx statuses are retried; the last
    /// attempt's error is returned once the budget is exhausted.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        retry_with_backoff(&self.config, url, |_| self.fetch_once(url)).await
    }

    async fn fetch_once(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(DataError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(DataError::Network)?;
        debug!(target: "karachi::fetch", url, bytes = body.len(), "fetched");
        Ok(body)
    }
}

impl std::fmt::Debug for ResilientFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientFetcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
