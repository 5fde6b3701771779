//! Sector rollups.

use super::enrich::enrich;
use crate::universe::Universe;
use karachi_data::{CompanyIdentity, EnrichedCompany, Fundamentals, IndexMetric, SectorRollup};
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Accumulator {
    market_cap: f64,
    count: usize,
    pe_sum: f64,
    pe_count: usize,
    change_sum: f64,
}

/// Roll up the companies in `membership` by sector.
///
/// Companies outside `membership` are ignored. See [`aggregate_enriched`]
/// for the per-sector arithmetic.
pub fn aggregate_sectors(
    companies: &[CompanyIdentity],
    membership: &impl Universe,
    metrics: &HashMap<String, IndexMetric>,
    fundamentals: &HashMap<String, Fundamentals>,
) -> Vec<SectorRollup> {
    let members: Vec<CompanyIdentity> = companies
        .iter()
        .filter(|c| membership.contains(&c.symbol))
        .cloned()
        .collect();
    aggregate_enriched(&enrich(&members, metrics, fundamentals))
}

/// Roll up enriched companies by their verbatim sector label.
///
/// Per sector:
/// - market cap sums [`EnrichedCompany::market_cap`]
/// - average P/E divides by the members with a known P/E only, zero if none
/// - average change divides by all members; members without an index metric
///   add zero
///
/// Percentages are taken against the total after it is summed. Output is
/// sorted by market cap, largest first, ties by name.
pub fn aggregate_enriched(companies: &[EnrichedCompany]) -> Vec<SectorRollup> {
    let mut groups: HashMap<&str, Accumulator> = HashMap::new();
    for company in companies {
        let acc = groups.entry(company.identity.sector.as_str()).or_default();
        acc.market_cap += company.market_cap();
        acc.count += 1;
        if let Some(pe) = company.pe() {
            acc.pe_sum += pe;
            acc.pe_count += 1;
        }
        acc.change_sum += company.metric.as_ref().map_or(0.0, |m| m.change_percent);
    }

    let total: f64 = groups.values().map(|acc| acc.market_cap).sum();

    let mut rollups: Vec<SectorRollup> = groups
        .into_iter()
        .map(|(name, acc)| SectorRollup {
            name: name.to_string(),
            market_cap: acc.market_cap,
            percentage: if total > 0.0 {
                acc.market_cap / total * 100.0
            } else {
                0.0
            },
            companies_count: acc.count,
            avg_pe: if acc.pe_count > 0 {
                acc.pe_sum / acc.pe_count as f64
            } else {
                0.0
            },
            avg_change: acc.change_sum / acc.count as f64,
        })
        .collect();

    rollups.sort_by(|a, b| {
        b.market_cap
            .total_cmp(&a.market_cap)
            .then_with(|| a.name.cmp(&b.name))
    });
    rollups
}
