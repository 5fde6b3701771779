//! The adapter surface consumed by a route layer.
//!
//! Every operation is a request-scoped pipeline over one [`DpsSource`]: index
//! snapshots and fundamentals come from its session cache, listings are
//! fetched per call. Pages that yield nothing are logged and answered with
//! the empty response shape; only transport failures are returned as errors.

use crate::aggregate::{SortBy, aggregate_sectors, enrich, rank, top_performers};
use crate::config::AdapterConfig;
use crate::universe::{ListedUniverse, Universe};
use chrono::Utc;
use karachi_data::cache::CacheStats;
use karachi_data::dps::listings::{clean_symbol, filter_by_index};
use karachi_data::{
    CompanyIdentity, DataError, DpsSource, EnrichedCompany, Extracted, Fundamentals, IndexCode,
    IndexMetric, IndexSnapshot, Result, SectorActivity, SectorRollup,
};
use karachi_output::{
    CompaniesResponse, CompanyAnalyticsResponse, CompanySummary, Mover, PerformersResponse,
    SectorBreakdownResponse, SectorCompaniesResponse, SectorCompany,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Filters for [`DpsAdapter::get_companies`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyFilter {
    /// Sector label, matched ignoring ASCII case.
    pub sector: Option<String>,
    /// Keep only companies listed in this index.
    pub index: Option<IndexCode>,
    /// 1-indexed page.
    pub page: Option<usize>,
    /// Page size.
    pub limit: Option<usize>,
    /// Load detail-page fundamentals for the companies on the page.
    pub with_fundamentals: bool,
}

impl Default for CompanyFilter {
    fn default() -> Self {
        Self {
            sector: None,
            index: None,
            page: None,
            limit: None,
            with_fundamentals: true,
        }
    }
}

impl CompanyFilter {
    /// Filter by sector.
    pub fn sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Filter by index.
    pub const fn index(mut self, index: IndexCode) -> Self {
        self.index = Some(index);
        self
    }

    /// Select a page.
    pub const fn page(mut self, page: usize, limit: usize) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Skip detail-page fetches.
    pub const fn without_fundamentals(mut self) -> Self {
        self.with_fundamentals = false;
        self
    }
}

/// Normalized view over the PSX data portal.
///
/// # Example
///
/// ```no_run
/// use karachi::{AdapterConfig, DpsAdapter};
///
/// # async fn example() -> karachi::data::Result<()> {
/// let adapter = DpsAdapter::new(AdapterConfig::from_env())?;
/// let breakdown = adapter.get_sector_breakdown(None).await?;
/// for sector in &breakdown.sectors {
///     println!("{}: {:.1}%", sector.name, sector.percentage);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DpsAdapter {
    source: DpsSource,
    config: AdapterConfig,
}

impl DpsAdapter {
    /// Create an adapter with its own session cache.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        config.validate()?;
        let source = DpsSource::with_config(config.base_url.as_str(), config.fetch.clone())?
            .with_concurrency(config.fundamentals_concurrency);
        Ok(Self { source, config })
    }

    /// Create an adapter configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(AdapterConfig::from_env())
    }

    /// Configuration in use.
    pub const fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Underlying page loader.
    pub const fn source(&self) -> &DpsSource {
        &self.source
    }

    /// Session cache entry counts.
    pub async fn cache_stats(&self) -> CacheStats {
        self.source.cache_stats().await
    }

    /// A page of listed companies.
    ///
    /// Filters apply in listing order; `total` counts every match. Companies
    /// on the page are enriched with the metrics of the filter's index, or of
    /// the default index when none is given.
    pub async fn get_companies(&self, filter: &CompanyFilter) -> Result<CompaniesResponse> {
        let page = filter.page.unwrap_or(1).max(1);
        let limit = self.config.page_limit(filter.limit);

        let mut companies = self.listed_companies().await?;
        if let Some(sector) = filter.sector.as_deref().map(str::trim) {
            companies.retain(|c| c.sector.eq_ignore_ascii_case(sector));
        }
        if let Some(index) = filter.index {
            companies = filter_by_index(companies, index);
        }

        let total = companies.len();
        let offset = (page - 1).saturating_mul(limit);
        if offset >= total {
            debug!(page, limit, total, "page past end of listing");
            return Ok(CompaniesResponse {
                total,
                ..CompaniesResponse::empty(page, limit)
            });
        }

        let page_companies: Vec<CompanyIdentity> =
            companies.into_iter().skip(offset).take(limit).collect();

        let snapshot = self
            .index_snapshot(filter.index.unwrap_or(self.config.default_index))
            .await?;
        let fundamentals = if filter.with_fundamentals {
            self.fundamentals_for(&page_companies).await
        } else {
            HashMap::new()
        };

        let enriched = enrich(&page_companies, &snapshot.metrics, &fundamentals);
        Ok(CompaniesResponse {
            companies: enriched.iter().map(CompanySummary::from).collect(),
            total,
            page,
            limit,
        })
    }

    /// Sector rollups of `index`, or of the default index.
    ///
    /// Membership and metrics are loaded before any fundamentals are fetched.
    /// An index page or listing with no rows yields the empty breakdown.
    pub async fn get_sector_breakdown(
        &self,
        index: Option<IndexCode>,
    ) -> Result<SectorBreakdownResponse> {
        let index = index.unwrap_or(self.config.default_index);
        let snapshot = self.index_snapshot(index).await?;
        if snapshot.is_empty() {
            return Ok(SectorBreakdownResponse::empty(Utc::now()));
        }

        let universe = ListedUniverse::new(self.listed_companies().await?);
        let members = universe.restrict_to(snapshot.as_ref());
        if members.len() < snapshot.len() {
            debug!(
                index = index.code(),
                constituents = snapshot.len(),
                listed = members.len(),
                "constituents missing from listings"
            );
        }

        let fundamentals = self.fundamentals_for(&members).await;
        let rollups = aggregate_sectors(&members, snapshot.as_ref(), &snapshot.metrics, &fundamentals);
        info!(index = index.code(), sectors = rollups.len(), companies = members.len(), "sector breakdown");

        Ok(SectorBreakdownResponse::new(rollups, Utc::now()))
    }

    /// Company, financials, ratios and performance of `symbol`.
    ///
    /// Returns `Ok(None)` when the symbol is not listed.
    pub async fn get_company_analytics(
        &self,
        symbol: &str,
    ) -> Result<Option<CompanyAnalyticsResponse>> {
        let symbol = clean_symbol(symbol);
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let universe = ListedUniverse::new(self.listed_companies().await?);
        let Some(identity) = universe.company(&symbol).cloned() else {
            debug!(symbol = %symbol, "symbol not listed");
            return Ok(None);
        };

        let snapshot = self.index_snapshot(self.config.default_index).await?;
        let fundamentals = self.source.load_fundamentals(&symbol).await?;
        let company = EnrichedCompany::new(
            identity,
            snapshot.metrics.get(&symbol).cloned(),
            Some(fundamentals),
        );
        Ok(Some(CompanyAnalyticsResponse::from(&company)))
    }

    /// The top `limit` companies of a sector, ranked by `sort_by`.
    ///
    /// With an index, only its constituents are considered and its metrics
    /// are used; otherwise every listed member of the sector is ranked with
    /// the default index's metrics.
    pub async fn get_sector_companies(
        &self,
        sector: &str,
        index: Option<IndexCode>,
        limit: usize,
        sort_by: SortBy,
    ) -> Result<SectorCompaniesResponse> {
        let universe = ListedUniverse::new(self.listed_companies().await?);
        let snapshot = self
            .index_snapshot(index.unwrap_or(self.config.default_index))
            .await?;

        let members: Vec<CompanyIdentity> = universe
            .in_sector(sector)
            .into_iter()
            .filter(|c| index.is_none() || snapshot.contains(&c.symbol))
            .cloned()
            .collect();
        let Some(label) = members.first().map(|c| c.sector.clone()) else {
            debug!(sector, "no companies in sector");
            return Ok(SectorCompaniesResponse::empty(sector.trim()));
        };

        let fundamentals = self.fundamentals_for(&members).await;
        let mut enriched = enrich(&members, &snapshot.metrics, &fundamentals);
        rank(&mut enriched, sort_by);

        let market_cap: f64 = enriched.iter().map(EnrichedCompany::market_cap).sum();
        let total = enriched.len();
        let companies = enriched
            .iter()
            .take(self.config.page_limit(Some(limit)))
            .map(|company| SectorCompany {
                summary: CompanySummary::from(company),
                sector_share: if market_cap > 0.0 {
                    company.market_cap() / market_cap * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Ok(SectorCompaniesResponse {
            sector: label,
            companies,
            total,
            market_cap,
        })
    }

    /// Rollups of the named sectors within `index`, in the requested order.
    ///
    /// Names match ignoring ASCII case; unknown names are skipped.
    /// Percentages stay relative to the whole index.
    pub async fn compare_sectors(
        &self,
        names: &[String],
        index: Option<IndexCode>,
    ) -> Result<Vec<SectorRollup>> {
        let breakdown = self.get_sector_breakdown(index).await?;
        let rollups = names
            .iter()
            .filter_map(|name| {
                let found = breakdown
                    .sectors
                    .iter()
                    .find(|s| s.name.eq_ignore_ascii_case(name.trim()));
                if found.is_none() {
                    debug!(sector = name.as_str(), "sector not in breakdown");
                }
                found.cloned()
            })
            .collect();
        Ok(rollups)
    }

    /// The `n` top gainers, losers and volume leaders of `index`, or of the
    /// default index.
    ///
    /// Drawn from the cached index snapshot; listings only add names and
    /// sectors. An index page with no rows yields empty lists.
    pub async fn get_performers(
        &self,
        index: Option<IndexCode>,
        n: usize,
    ) -> Result<PerformersResponse> {
        let index = index.unwrap_or(self.config.default_index);
        let snapshot = self.index_snapshot(index).await?;
        if snapshot.is_empty() {
            return Ok(PerformersResponse::empty(index.code(), Utc::now()));
        }

        let performers = top_performers(&snapshot.metrics, self.config.page_limit(Some(n)));
        let universe = ListedUniverse::new(self.listed_companies().await?);
        let movers = |list: &[IndexMetric]| -> Vec<Mover> {
            list.iter()
                .map(|m| Mover::new(m, universe.company(&m.symbol)))
                .collect()
        };
        debug!(
            index = index.code(),
            gainers = performers.gainers.len(),
            losers = performers.losers.len(),
            "performers"
        );

        Ok(PerformersResponse {
            index: index.code().to_string(),
            gainers: movers(&performers.gainers),
            losers: movers(&performers.losers),
            volume_leaders: movers(&performers.volume_leaders),
            last_updated: Utc::now(),
        })
    }

    /// Advance/decline activity per sector for the session.
    pub async fn get_sector_activity(&self) -> Result<Vec<SectorActivity>> {
        Ok(self.source.load_sector_activity().await?.unwrap_or_default())
    }

    async fn listed_companies(&self) -> Result<Vec<CompanyIdentity>> {
        Ok(self.source.load_companies().await?.unwrap_or_default())
    }

    async fn index_snapshot(&self, index: IndexCode) -> Result<Arc<IndexSnapshot>> {
        match self.source.load_index_metrics(index).await? {
            Extracted::Data(snapshot) => Ok(snapshot),
            Extracted::Empty(_) => Ok(Arc::new(IndexSnapshot::default())),
        }
    }

    async fn fundamentals_for(&self, companies: &[CompanyIdentity]) -> HashMap<String, Fundamentals> {
        let symbols: Vec<String> = companies.iter().map(|c| c.symbol.clone()).collect();
        let fundamentals = self.source.load_fundamentals_batch(&symbols).await;
        if fundamentals.len() < symbols.len() {
            warn!(
                requested = symbols.len(),
                loaded = fundamentals.len(),
                "fundamentals missing for some symbols"
            );
        }
        fundamentals
    }
}
