//! Adapter configuration, with environment overrides.

use karachi_data::dps::{DEFAULT_BASE_URL, default_concurrency};
use karachi_data::fetch::FetchConfig;
use karachi_data::{DataError, IndexCode, Result};
use std::str::FromStr;
use std::time::Duration;

/// Page size used when a request does not give one.
pub const DEFAULT_PAGE_LIMIT: usize = 20;

/// Largest page size a request may ask for.
pub const MAX_PAGE_LIMIT: usize = 500;

/// Adapter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    /// Portal base URL.
    pub base_url: String,
    /// Fetch timeout, retry and backoff settings.
    pub fetch: FetchConfig,
    /// Index used when a request does not name one.
    pub default_index: IndexCode,
    /// Concurrent detail-page fetches in a batch.
    pub fundamentals_concurrency: usize,
    /// Page size used when a request does not give one.
    pub default_page_limit: usize,
    /// Largest accepted page size.
    pub max_page_limit: usize,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch: FetchConfig::default(),
            default_index: IndexCode::Kse100,
            fundamentals_concurrency: default_concurrency(),
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: MAX_PAGE_LIMIT,
        }
    }
}

impl AdapterConfig {
    /// Defaults overlaid with `KARACHI_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    ///
    /// Recognised keys: `KARACHI_BASE_URL`, `KARACHI_TIMEOUT_SECS`,
    /// `KARACHI_MAX_RETRIES`, `KARACHI_BACKOFF_MS`, `KARACHI_DEFAULT_INDEX`,
    /// `KARACHI_CONCURRENCY`. Unparsable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let mut fetch = defaults.fetch.clone();
        if let Some(secs) = parse("KARACHI_TIMEOUT_SECS").filter(|s| *s > 0) {
            fetch = fetch.with_timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = parse("KARACHI_MAX_RETRIES").and_then(|r| u32::try_from(r).ok()) {
            fetch = fetch.with_max_retries(retries);
        }
        if let Some(ms) = parse("KARACHI_BACKOFF_MS") {
            fetch = fetch.with_backoff_base(Duration::from_millis(ms));
        }

        Self {
            base_url: lookup("KARACHI_BASE_URL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.base_url),
            fetch,
            default_index: lookup("KARACHI_DEFAULT_INDEX")
                .and_then(|v| IndexCode::from_str(&v).ok())
                .unwrap_or(defaults.default_index),
            fundamentals_concurrency: parse("KARACHI_CONCURRENCY")
                .and_then(|c| usize::try_from(c).ok())
                .filter(|c| *c > 0)
                .unwrap_or(defaults.fundamentals_concurrency),
            ..defaults
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the fetch settings.
    pub fn with_fetch(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Set the default index.
    pub const fn with_default_index(mut self, index: IndexCode) -> Self {
        self.default_index = index;
        self
    }

    /// Set the batch concurrency.
    pub const fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.fundamentals_concurrency = concurrency;
        self
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DataError::Config(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }
        if self.fetch.timeout.is_zero() {
            return Err(DataError::Config("timeout must be positive".to_string()));
        }
        if self.default_page_limit == 0 || self.default_page_limit > self.max_page_limit {
            return Err(DataError::Config(format!(
                "default page limit {} outside 1..={}",
                self.default_page_limit, self.max_page_limit
            )));
        }
        Ok(())
    }

    /// Clamp a requested page size to `1..=max_page_limit`.
    pub fn page_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_limit)
            .clamp(1, self.max_page_limit.max(1))
    }
}
