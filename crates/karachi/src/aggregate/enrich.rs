//! Joining company identities with their enrichment.

use karachi_data::{CompanyIdentity, EnrichedCompany, Fundamentals, IndexMetric};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Join each company with its index metric and fundamentals, when present.
pub fn enrich(
    companies: &[CompanyIdentity],
    metrics: &HashMap<String, IndexMetric>,
    fundamentals: &HashMap<String, Fundamentals>,
) -> Vec<EnrichedCompany> {
    companies
        .iter()
        .map(|company| {
            EnrichedCompany::new(
                company.clone(),
                metrics.get(&company.symbol).cloned(),
                fundamentals.get(&company.symbol).cloned(),
            )
        })
        .collect()
}

/// Ordering applied to company lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Largest market cap first.
    #[default]
    MarketCap,
    /// Largest daily change first.
    Change,
    /// Lowest positive P/E first; unknown or non-positive P/E last.
    Pe,
    /// Alphabetical by symbol.
    Symbol,
}

impl SortBy {
    fn compare(self, a: &EnrichedCompany, b: &EnrichedCompany) -> Ordering {
        let primary = match self {
            Self::MarketCap => b.market_cap().total_cmp(&a.market_cap()),
            Self::Change => {
                let change = |c: &EnrichedCompany| c.change_percent().unwrap_or(f64::NEG_INFINITY);
                change(b).total_cmp(&change(a))
            }
            Self::Pe => {
                let pe = |c: &EnrichedCompany| c.pe().filter(|pe| *pe > 0.0).unwrap_or(f64::INFINITY);
                pe(a).total_cmp(&pe(b))
            }
            Self::Symbol => Ordering::Equal,
        };
        primary.then_with(|| a.symbol().cmp(b.symbol()))
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MarketCap => "marketCap",
            Self::Change => "change",
            Self::Pe => "pe",
            Self::Symbol => "symbol",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "marketcap" | "cap" => Ok(Self::MarketCap),
            "change" | "performance" => Ok(Self::Change),
            "pe" => Ok(Self::Pe),
            "symbol" => Ok(Self::Symbol),
            _ => Err(format!("unknown sort key: {s}")),
        }
    }
}

/// Sort companies in place; ties fall back to symbol order.
pub fn rank(companies: &mut [EnrichedCompany], sort_by: SortBy) {
    companies.sort_by(|a, b| sort_by.compare(a, b));
}
