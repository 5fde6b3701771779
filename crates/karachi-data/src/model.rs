//! Typed records produced from the portal's pages.

use crate::index::IndexCode;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Canonical identity of a listed company, from the listings page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyIdentity {
    /// Uppercase alphanumeric symbol, unique per fetch.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// Sector label exactly as published.
    pub sector: String,
    /// Clearing type (e.g. "CDS").
    pub clearing_type: String,
    /// Total shares outstanding.
    pub shares_outstanding: u64,
    /// Free-float shares.
    pub free_float: u64,
    /// Raw listed-in cell, used for index filtering.
    pub listed_in: String,
}

/// Per-constituent snapshot from an index page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetric {
    /// Symbol.
    pub symbol: String,
    /// Current price.
    pub price: f64,
    /// Daily change in percent.
    pub change_percent: f64,
    /// Shares traded in the session.
    #[serde(default)]
    pub volume: u64,
    /// Market capitalization in millions.
    pub market_cap_millions: f64,
}

/// Membership and metrics of one index, as loaded from its constituents page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexSnapshot {
    /// Index the snapshot belongs to.
    pub index: Option<IndexCode>,
    /// Constituent symbols.
    pub membership: HashSet<String>,
    /// Metrics keyed by symbol.
    pub metrics: HashMap<String, IndexMetric>,
}

impl IndexSnapshot {
    /// Build a snapshot from metrics; membership is the set of their symbols.
    pub fn from_metrics(index: IndexCode, metrics: Vec<IndexMetric>) -> Self {
        let mut snapshot = Self {
            index: Some(index),
            ..Self::default()
        };
        for metric in metrics {
            if snapshot.membership.insert(metric.symbol.clone()) {
                snapshot.metrics.insert(metric.symbol.clone(), metric);
            }
        }
        snapshot
    }

    /// Number of constituents.
    pub fn len(&self) -> usize {
        self.membership.len()
    }

    /// Whether no constituent was found.
    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }
}

/// Supplementary figures from a company detail page.
///
/// Every field is optional: extraction may miss per symbol without failing
/// a batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    /// Symbol.
    pub symbol: String,
    /// Trailing price/earnings ratio.
    pub pe: Option<f64>,
    /// Market capitalization in millions (page reports thousands).
    pub market_cap_millions: Option<f64>,
    /// Last traded price.
    pub price: Option<f64>,
    /// Daily change in percent.
    pub change_percent: Option<f64>,
    /// 52-week high.
    pub high_52w: Option<f64>,
    /// 52-week low.
    pub low_52w: Option<f64>,
    /// Meta description of the company page.
    pub description: Option<String>,
}

impl Fundamentals {
    /// Empty fundamentals for a symbol.
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Whether no field could be extracted.
    pub const fn is_empty(&self) -> bool {
        self.pe.is_none()
            && self.market_cap_millions.is_none()
            && self.price.is_none()
            && self.change_percent.is_none()
            && self.high_52w.is_none()
            && self.low_52w.is_none()
            && self.description.is_none()
    }
}

/// Aggregated metrics for one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorRollup {
    /// Sector label, verbatim.
    pub name: String,
    /// Summed market cap in millions.
    pub market_cap: f64,
    /// Share of the total market cap, in percent.
    pub percentage: f64,
    /// Number of member companies.
    pub companies_count: usize,
    /// Mean P/E over members with a known P/E; zero when none.
    #[serde(rename = "avgPE")]
    pub avg_pe: f64,
    /// Mean daily change; members without a metric count as zero.
    #[serde(rename = "performance1M")]
    pub avg_change: f64,
}

/// Company identity joined with whatever enrichment is available.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedCompany {
    /// Identity from the listings page.
    pub identity: CompanyIdentity,
    /// Index metric, if the symbol is a constituent.
    pub metric: Option<IndexMetric>,
    /// Detail-page fundamentals, if loaded.
    pub fundamentals: Option<Fundamentals>,
}

impl EnrichedCompany {
    /// Join an identity with optional enrichment.
    pub const fn new(
        identity: CompanyIdentity,
        metric: Option<IndexMetric>,
        fundamentals: Option<Fundamentals>,
    ) -> Self {
        Self {
            identity,
            metric,
            fundamentals,
        }
    }

    /// Symbol.
    pub fn symbol(&self) -> &str {
        &self.identity.symbol
    }

    /// Market cap in millions.
    ///
    /// Index metric first, then the detail-page figure, then shares times the
    /// detail-page price, else zero.
    pub fn market_cap(&self) -> f64 {
        if let Some(metric) = &self.metric {
            return metric.market_cap_millions;
        }
        let Some(fundamentals) = &self.fundamentals else {
            return 0.0;
        };
        if let Some(cap) = fundamentals.market_cap_millions {
            return cap;
        }
        fundamentals.price.map_or(0.0, |price| {
            self.identity.shares_outstanding as f64 * price / 1_000_000.0
        })
    }

    /// Current price, index page first.
    pub fn price(&self) -> Option<f64> {
        self.metric
            .as_ref()
            .map(|m| m.price)
            .or_else(|| self.fundamentals.as_ref().and_then(|f| f.price))
    }

    /// Daily change percent, index page first.
    pub fn change_percent(&self) -> Option<f64> {
        self.metric
            .as_ref()
            .map(|m| m.change_percent)
            .or_else(|| self.fundamentals.as_ref().and_then(|f| f.change_percent))
    }

    /// Trailing P/E, if known.
    pub fn pe(&self) -> Option<f64> {
        self.fundamentals.as_ref().and_then(|f| f.pe)
    }
}

/// Advance/decline counts for a sector from the sector summary page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorActivity {
    /// Sector label.
    pub name: String,
    /// Advancing symbols.
    pub advance: u32,
    /// Declining symbols.
    pub decline: u32,
    /// Unchanged symbols.
    pub unchanged: u32,
    /// Traded volume for the session.
    pub turnover: f64,
    /// Sector market cap in billions.
    pub market_cap_billions: f64,
}

impl SectorActivity {
    /// Advancing over declining; `None` when nothing declined.
    pub fn advance_decline_ratio(&self) -> Option<f64> {
        (self.decline > 0).then(|| f64::from(self.advance) / f64::from(self.decline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn identity(symbol: &str, shares: u64) -> CompanyIdentity {
        CompanyIdentity {
            symbol: symbol.to_string(),
            name: format!("{symbol} Limited"),
            sector: "Banking".to_string(),
            clearing_type: "CDS".to_string(),
            shares_outstanding: shares,
            free_float: shares / 2,
            listed_in: "KSE100".to_string(),
        }
    }

    #[test]
    fn test_snapshot_first_metric_wins() {
        let metrics = vec![
            IndexMetric {
                symbol: "HBL".to_string(),
                price: 142.5,
                change_percent: 2.1,
                volume: 0,
                market_cap_millions: 485_000.0,
            },
            IndexMetric {
                symbol: "HBL".to_string(),
                price: 1.0,
                change_percent: 0.0,
                volume: 0,
                market_cap_millions: 1.0,
            },
        ];
        let snapshot = IndexSnapshot::from_metrics(IndexCode::Kse100, metrics);
        assert_eq!(snapshot.len(), 1);
        assert_relative_eq!(snapshot.metrics["HBL"].price, 142.5);
    }

    #[test]
    fn test_market_cap_precedence() {
        let metric = IndexMetric {
            symbol: "HBL".to_string(),
            price: 142.5,
            change_percent: 2.1,
            volume: 0,
            market_cap_millions: 485_000.0,
        };
        let fundamentals = Fundamentals {
            market_cap_millions: Some(480_000.0),
            price: Some(140.0),
            ..Fundamentals::empty("HBL")
        };

        let full = EnrichedCompany::new(
            identity("HBL", 3_400_000_000),
            Some(metric),
            Some(fundamentals.clone()),
        );
        assert_relative_eq!(full.market_cap(), 485_000.0);

        let detail_only =
            EnrichedCompany::new(identity("HBL", 3_400_000_000), None, Some(fundamentals));
        assert_relative_eq!(detail_only.market_cap(), 480_000.0);

        let estimated = EnrichedCompany::new(
            identity("HBL", 3_400_000_000),
            None,
            Some(Fundamentals {
                price: Some(100.0),
                ..Fundamentals::empty("HBL")
            }),
        );
        assert_relative_eq!(estimated.market_cap(), 340_000.0);

        let bare = EnrichedCompany::new(identity("HBL", 3_400_000_000), None, None);
        assert_relative_eq!(bare.market_cap(), 0.0);
        assert!(bare.price().is_none());
    }

    #[test]
    fn test_rollup_json_field_names() {
        let rollup = SectorRollup {
            name: "Banking".to_string(),
            market_cap: 485_000.0,
            percentage: 100.0,
            companies_count: 1,
            avg_pe: 6.2,
            avg_change: 2.1,
        };
        let json = serde_json::to_value(&rollup).unwrap();
        assert_eq!(json["companiesCount"], 1);
        assert_eq!(json["avgPE"], 6.2);
        assert_eq!(json["performance1M"], 2.1);
        assert_eq!(json["marketCap"], 485_000.0);
    }

    #[test]
    fn test_advance_decline_ratio() {
        let activity = SectorActivity {
            name: "CEMENT".to_string(),
            advance: 6,
            decline: 3,
            unchanged: 1,
            turnover: 0.0,
            market_cap_billions: 0.0,
        };
        assert_relative_eq!(activity.advance_decline_ratio().unwrap(), 2.0);

        let flat = SectorActivity {
            decline: 0,
            ..activity
        };
        assert!(flat.advance_decline_ratio().is_none());
    }
}
