//! Session movers of an index: gainers, losers and volume leaders.

use karachi_data::IndexMetric;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Top movers of one index session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Performers {
    /// Positive change, largest first.
    pub gainers: Vec<IndexMetric>,
    /// Negative change, largest drop first.
    pub losers: Vec<IndexMetric>,
    /// Non-zero volume, largest first.
    pub volume_leaders: Vec<IndexMetric>,
}

impl Performers {
    /// Whether all three lists are empty.
    pub fn is_empty(&self) -> bool {
        self.gainers.is_empty() && self.losers.is_empty() && self.volume_leaders.is_empty()
    }
}

/// Pick the `n` top gainers, losers and volume leaders from index metrics.
///
/// Unchanged constituents are neither gainers nor losers. Ties fall back to
/// symbol order so the result does not depend on map iteration order.
pub fn top_performers(metrics: &HashMap<String, IndexMetric>, n: usize) -> Performers {
    let pick = |keep: fn(&IndexMetric) -> bool, order: fn(&IndexMetric, &IndexMetric) -> Ordering| {
        let mut picked: Vec<IndexMetric> = metrics.values().filter(|m| keep(m)).cloned().collect();
        picked.sort_by(|a, b| order(a, b).then_with(|| a.symbol.cmp(&b.symbol)));
        picked.truncate(n);
        picked
    };

    Performers {
        gainers: pick(
            |m| m.change_percent > 0.0,
            |a, b| b.change_percent.total_cmp(&a.change_percent),
        ),
        losers: pick(
            |m| m.change_percent < 0.0,
            |a, b| a.change_percent.total_cmp(&b.change_percent),
        ),
        volume_leaders: pick(|m| m.volume > 0, |a, b| b.volume.cmp(&a.volume)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(symbol: &str, change: f64, volume: u64) -> (String, IndexMetric) {
        (
            symbol.to_string(),
            IndexMetric {
                symbol: symbol.to_string(),
                price: 100.0,
                change_percent: change,
                volume,
                market_cap_millions: 1.0,
            },
        )
    }

    fn symbols(list: &[IndexMetric]) -> Vec<&str> {
        list.iter().map(|m| m.symbol.as_str()).collect()
    }

    fn session() -> HashMap<String, IndexMetric> {
        HashMap::from([
            metric("HBL", 2.1, 5_120_330),
            metric("UBL", -0.85, 1_904_112),
            metric("LUCK", 1.52, 402_551),
            metric("OGDC", 0.0, 7_880_004),
            metric("PSO", -3.4, 0),
            metric("MCB", 2.1, 90_000),
        ])
    }

    #[test]
    fn test_gainers_and_losers() {
        let performers = top_performers(&session(), 10);
        assert_eq!(symbols(&performers.gainers), vec!["HBL", "MCB", "LUCK"]);
        assert_eq!(symbols(&performers.losers), vec!["PSO", "UBL"]);
    }

    #[test]
    fn test_unchanged_is_neither() {
        let performers = top_performers(&session(), 10);
        assert!(performers.gainers.iter().all(|m| m.symbol != "OGDC"));
        assert!(performers.losers.iter().all(|m| m.symbol != "OGDC"));
    }

    #[test]
    fn test_volume_leaders_skip_untraded() {
        let performers = top_performers(&session(), 3);
        assert_eq!(symbols(&performers.volume_leaders), vec!["OGDC", "HBL", "UBL"]);

        let all = top_performers(&session(), 10);
        assert!(all.volume_leaders.iter().all(|m| m.symbol != "PSO"));
    }

    #[test]
    fn test_lists_truncated_to_n() {
        let performers = top_performers(&session(), 1);
        assert_eq!(symbols(&performers.gainers), vec!["HBL"]);
        assert_eq!(symbols(&performers.losers), vec!["PSO"]);
        assert_eq!(symbols(&performers.volume_leaders), vec!["OGDC"]);

        assert!(top_performers(&session(), 0).is_empty());
        assert!(top_performers(&HashMap::new(), 5).is_empty());
    }
}
