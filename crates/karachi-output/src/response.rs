//! Response envelopes returned by the adapter surface.
//!
//! Field names serialize in camelCase; optional figures that could not be
//! extracted are omitted rather than emitted as `null`.

use chrono::{DateTime, Utc};
use karachi_data::{CompanyIdentity, EnrichedCompany, IndexMetric, SectorRollup};
use serde::{Deserialize, Serialize};

/// One row of a company listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    /// Symbol.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Sector label.
    pub sector: String,
    /// Market cap in millions.
    pub market_cap: f64,
    /// Current price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Daily change in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    /// Trailing P/E.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe: Option<f64>,
}

impl From<&EnrichedCompany> for CompanySummary {
    fn from(company: &EnrichedCompany) -> Self {
        Self {
            symbol: company.identity.symbol.clone(),
            name: company.identity.name.clone(),
            sector: company.identity.sector.clone(),
            market_cap: company.market_cap(),
            price: company.price(),
            change: company.change_percent(),
            pe: company.pe(),
        }
    }
}

/// A page of companies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompaniesResponse {
    /// Companies on this page.
    pub companies: Vec<CompanySummary>,
    /// Companies matching the filter across all pages.
    pub total: usize,
    /// 1-indexed page number.
    pub page: usize,
    /// Page size.
    pub limit: usize,
}

impl CompaniesResponse {
    /// Empty page.
    pub const fn empty(page: usize, limit: usize) -> Self {
        Self {
            companies: Vec::new(),
            total: 0,
            page,
            limit,
        }
    }

    /// Number of pages at the current limit.
    pub const fn pages(&self) -> usize {
        if self.limit == 0 {
            0
        } else {
            self.total.div_ceil(self.limit)
        }
    }
}

/// Sector rollups of an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorBreakdownResponse {
    /// Rollups, largest market cap first.
    pub sectors: Vec<SectorRollup>,
    /// Sum of the rollups' market caps, in millions.
    pub total_market_cap: f64,
    /// When the breakdown was computed.
    pub last_updated: DateTime<Utc>,
}

impl SectorBreakdownResponse {
    /// Build a breakdown stamped with `last_updated`.
    pub fn new(sectors: Vec<SectorRollup>, last_updated: DateTime<Utc>) -> Self {
        let total_market_cap = sectors.iter().map(|s| s.market_cap).sum();
        Self {
            sectors,
            total_market_cap,
            last_updated,
        }
    }

    /// Breakdown with no sectors and a zero total.
    pub const fn empty(last_updated: DateTime<Utc>) -> Self {
        Self {
            sectors: Vec::new(),
            total_market_cap: 0.0,
            last_updated,
        }
    }

    /// Rollup of a sector by exact name.
    pub fn sector(&self, name: &str) -> Option<&SectorRollup> {
        self.sectors.iter().find(|s| s.name == name)
    }
}

/// Identity block of a company analytics bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Symbol.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Sector label.
    pub sector: String,
    /// Market cap in millions.
    pub market_cap: f64,
    /// Total shares outstanding.
    pub shares_outstanding: u64,
    /// Boards and indices the company is listed in.
    pub listed_in: String,
    /// Company description from the detail page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Share structure and size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    /// Market cap in millions.
    pub market_cap: f64,
    /// Total shares outstanding.
    pub shares_outstanding: u64,
    /// Free-float shares.
    pub free_float: u64,
    /// Free float as a percent of shares outstanding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_float_percent: Option<f64>,
}

/// Valuation ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratios {
    /// Trailing P/E.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pe: Option<f64>,
    /// Earnings yield in percent, the inverse of a positive P/E.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earnings_yield: Option<f64>,
}

/// Price performance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    /// Current price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Daily change in percent.
    #[serde(rename = "change1D", default, skip_serializing_if = "Option::is_none")]
    pub change_1d: Option<f64>,
    /// 52-week high.
    #[serde(rename = "high52W", default, skip_serializing_if = "Option::is_none")]
    pub high_52w: Option<f64>,
    /// 52-week low.
    #[serde(rename = "low52W", default, skip_serializing_if = "Option::is_none")]
    pub low_52w: Option<f64>,
    /// Where the price sits in the 52-week range, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_position: Option<f64>,
}

/// Company, financials, ratios and performance of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyAnalyticsResponse {
    /// Identity block.
    pub company: CompanyProfile,
    /// Share structure.
    pub financials: Financials,
    /// Valuation.
    pub ratios: Ratios,
    /// Price performance.
    pub performance: Performance,
}

impl From<&EnrichedCompany> for CompanyAnalyticsResponse {
    fn from(company: &EnrichedCompany) -> Self {
        let identity = &company.identity;
        let fundamentals = company.fundamentals.as_ref();
        let market_cap = company.market_cap();
        let pe = company.pe();
        let price = company.price();
        let high_52w = fundamentals.and_then(|f| f.high_52w);
        let low_52w = fundamentals.and_then(|f| f.low_52w);

        let range_position = match (price, low_52w, high_52w) {
            (Some(price), Some(low), Some(high)) if high > low => {
                Some((price - low) / (high - low) * 100.0)
            }
            _ => None,
        };

        Self {
            company: CompanyProfile {
                symbol: identity.symbol.clone(),
                name: identity.name.clone(),
                sector: identity.sector.clone(),
                market_cap,
                shares_outstanding: identity.shares_outstanding,
                listed_in: identity.listed_in.clone(),
                description: fundamentals.and_then(|f| f.description.clone()),
            },
            financials: Financials {
                market_cap,
                shares_outstanding: identity.shares_outstanding,
                free_float: identity.free_float,
                free_float_percent: (identity.shares_outstanding > 0).then(|| {
                    identity.free_float as f64 / identity.shares_outstanding as f64 * 100.0
                }),
            },
            ratios: Ratios {
                pe,
                earnings_yield: pe.filter(|pe| *pe > 0.0).map(|pe| 100.0 / pe),
            },
            performance: Performance {
                price,
                change_1d: company.change_percent(),
                high_52w,
                low_52w,
                range_position,
            },
        }
    }
}

/// A company ranked within its sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorCompany {
    /// Listing row.
    #[serde(flatten)]
    pub summary: CompanySummary,
    /// Share of the sector's market cap, in percent.
    pub sector_share: f64,
}

/// Top companies of one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorCompaniesResponse {
    /// Sector label.
    pub sector: String,
    /// Ranked companies, at most the requested limit.
    pub companies: Vec<SectorCompany>,
    /// Members of the sector before the limit was applied.
    pub total: usize,
    /// Sector market cap in millions.
    pub market_cap: f64,
}

impl SectorCompaniesResponse {
    /// Response for a sector with no members.
    pub fn empty(sector: impl Into<String>) -> Self {
        Self {
            sector: sector.into(),
            companies: Vec::new(),
            total: 0,
            market_cap: 0.0,
        }
    }
}

/// One constituent in a list of session movers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mover {
    /// Symbol.
    pub symbol: String,
    /// Display name, when the symbol is listed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Sector label, when the symbol is listed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// Current price.
    pub price: f64,
    /// Daily change in percent.
    pub change: f64,
    /// Shares traded in the session.
    pub volume: u64,
}

impl Mover {
    /// Mover from an index row and, if known, the company's listing.
    pub fn new(metric: &IndexMetric, identity: Option<&CompanyIdentity>) -> Self {
        Self {
            symbol: metric.symbol.clone(),
            name: identity.map(|c| c.name.clone()),
            sector: identity.map(|c| c.sector.clone()),
            price: metric.price,
            change: metric.change_percent,
            volume: metric.volume,
        }
    }
}

/// Gainers, losers and volume leaders of one index session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformersResponse {
    /// Index code the movers were drawn from.
    pub index: String,
    /// Largest rises first.
    pub gainers: Vec<Mover>,
    /// Largest drops first.
    pub losers: Vec<Mover>,
    /// Most traded first.
    pub volume_leaders: Vec<Mover>,
    /// When the lists were computed.
    pub last_updated: DateTime<Utc>,
}

impl PerformersResponse {
    /// Response with no movers.
    pub fn empty(index: impl Into<String>, last_updated: DateTime<Utc>) -> Self {
        Self {
            index: index.into(),
            gainers: Vec::new(),
            losers: Vec::new(),
            volume_leaders: Vec::new(),
            last_updated,
        }
    }

    /// Whether all three lists are empty.
    pub fn is_empty(&self) -> bool {
        self.gainers.is_empty() && self.losers.is_empty() && self.volume_leaders.is_empty()
    }
}
