//! PSX data portal (DPS) pages and the loaders that memoize them.
//!
//! Each page has its own narrow parser module. [`DpsSource`] ties them to
//! the fetcher and the session cache.

pub mod company;
pub mod indices;
pub mod listings;
pub mod sectorwise;

use crate::cache::{CacheStats, SessionCache};
use crate::error::{DataError, Result};
use crate::extract::{Extracted, extract_rows};
use crate::fetch::{FetchConfig, ResilientFetcher};
use crate::index::IndexCode;
use crate::model::{CompanyIdentity, Fundamentals, IndexSnapshot, SectorActivity};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Portal base URL.
pub const DEFAULT_BASE_URL: &str = "https://dps.psx.com.pk";

/// Concurrent detail-page fetches the host allows.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(4)
}

/// Loader for the portal's pages, scoped to one session cache.
#[derive(Debug)]
pub struct DpsSource {
    fetcher: ResilientFetcher,
    base_url: String,
    cache: SessionCache,
    concurrency: usize,
}

impl DpsSource {
    /// Source against the live portal with default fetch settings.
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_BASE_URL, FetchConfig::default())
    }

    /// Source against `base_url` with custom fetch settings.
    pub fn with_config(base_url: impl Into<String>, config: FetchConfig) -> Result<Self> {
        Ok(Self::with_fetcher(
            ResilientFetcher::with_config(config)?,
            base_url,
        ))
    }

    /// Source using an existing fetcher.
    pub fn with_fetcher(fetcher: ResilientFetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: SessionCache::new(),
            concurrency: default_concurrency(),
        }
    }

    /// Bound the number of concurrent detail-page fetches in a batch.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Base URL in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session cache.
    pub const fn cache(&self) -> &SessionCache {
        &self.cache
    }

    /// Cache entry counts.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// `GET /listings-table/main/nc`
    pub fn listings_url(&self) -> String {
        format!("{}/listings-table/main/nc", self.base_url)
    }

    /// `GET /indices/{code}`
    pub fn index_url(&self, index: IndexCode) -> String {
        format!("{}/indices/{}", self.base_url, index.code())
    }

    /// `GET /company/{symbol}`
    pub fn company_url(&self, symbol: &str) -> String {
        format!("{}/company/{}", self.base_url, symbol)
    }

    /// `GET /sector-summary/sectorwise`
    pub fn sectorwise_url(&self) -> String {
        format!("{}/sector-summary/sectorwise", self.base_url)
    }

    /// Fetch and parse the listings page. Not cached.
    pub async fn load_companies(&self) -> Result<Extracted<Vec<CompanyIdentity>>> {
        let body = self.fetcher.fetch(&self.listings_url()).await?;
        let rows = extract_rows(&body);
        let companies = listings::parse_companies_tagged(&rows);
        match &companies {
            Extracted::Data(list) => info!(count = list.len(), "parsed listings"),
            Extracted::Empty(reason) => warn!(%reason, page = "listings", "no companies extracted"),
        }
        Ok(companies)
    }

    /// Membership and metrics of `index`, fetched once per session.
    ///
    /// Empty pages are not cached so a later call retries the fetch.
    pub async fn load_index_metrics(&self, index: IndexCode) -> Result<Extracted<Arc<IndexSnapshot>>> {
        if let Some(snapshot) = self.cache.index(index).await {
            debug!(index = index.code(), "index cache hit");
            return Ok(Extracted::Data(snapshot));
        }

        debug!(index = index.code(), "index cache miss");
        let body = self.fetcher.fetch(&self.index_url(index)).await?;
        match indices::parse_index_page(index, &body) {
            Extracted::Data(snapshot) => {
                info!(index = index.code(), constituents = snapshot.len(), "parsed index");
                Ok(Extracted::Data(self.cache.insert_index(index, snapshot).await))
            }
            Extracted::Empty(reason) => {
                warn!(%reason, index = index.code(), "no constituents extracted");
                Ok(Extracted::Empty(reason))
            }
        }
    }

    /// Fundamentals of `symbol`, fetched once per session.
    ///
    /// A page without any recognised statistic still caches an empty record.
    pub async fn load_fundamentals(&self, symbol: &str) -> Result<Fundamentals> {
        let symbol = listings::clean_symbol(symbol);
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        if let Some(cached) = self.cache.fundamentals(&symbol).await {
            debug!(symbol = %symbol, "fundamentals cache hit");
            return Ok((*cached).clone());
        }

        let body = self.fetcher.fetch(&self.company_url(&symbol)).await?;
        let fundamentals = match company::parse_fundamentals(&symbol, &body) {
            Extracted::Data(fundamentals) => fundamentals,
            Extracted::Empty(reason) => {
                warn!(%reason, symbol = %symbol, "no fundamentals extracted");
                Fundamentals::empty(symbol.as_str())
            }
        };
        Ok((*self.cache.insert_fundamentals(fundamentals).await).clone())
    }

    /// Fundamentals for many symbols, fetched concurrently.
    ///
    /// Completion order is unspecified. Symbols whose fetch fails are logged
    /// and left out of the map.
    pub async fn load_fundamentals_batch(&self, symbols: &[String]) -> HashMap<String, Fundamentals> {
        stream::iter(symbols)
            .map(|symbol| async move { (symbol, self.load_fundamentals(symbol).await) })
            .buffer_unordered(self.concurrency)
            .filter_map(|(symbol, result)| async move {
                match result {
                    Ok(fundamentals) => Some((fundamentals.symbol.clone(), fundamentals)),
                    Err(e) => {
                        warn!(symbol = symbol.as_str(), error = %e, "fundamentals fetch failed");
                        None
                    }
                }
            })
            .collect()
            .await
    }

    /// Fetch and parse the sector summary page. Not cached.
    pub async fn load_sector_activity(&self) -> Result<Extracted<Vec<SectorActivity>>> {
        let body = self.fetcher.fetch(&self.sectorwise_url()).await?;
        let activity = sectorwise::parse_sector_activity(&extract_rows(&body));
        if let Extracted::Empty(reason) = &activity {
            warn!(%reason, page = "sectorwise", "no sector activity extracted");
        }
        Ok(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let fetcher = ResilientFetcher::new().unwrap();
        let source = DpsSource::with_fetcher(fetcher, "https://dps.psx.com.pk/");
        assert_eq!(
            source.listings_url(),
            "https://dps.psx.com.pk/listings-table/main/nc"
        );
        assert_eq!(
            source.index_url(IndexCode::Kse100),
            "https://dps.psx.com.pk/indices/KSE100"
        );
        assert_eq!(source.company_url("HBL"), "https://dps.psx.com.pk/company/HBL");
        assert_eq!(
            source.sectorwise_url(),
            "https://dps.psx.com.pk/sector-summary/sectorwise"
        );
    }

    #[tokio::test]
    async fn test_invalid_symbol() {
        let source = DpsSource::new().unwrap();
        let result = source.load_fundamentals("***").await;
        assert!(matches!(result, Err(DataError::InvalidSymbol(_))));
    }

    #[test]
    fn test_concurrency_floor() {
        let source = DpsSource::new().unwrap().with_concurrency(0);
        assert_eq!(source.concurrency, 1);
        assert!(default_concurrency() >= 1);
    }
}
