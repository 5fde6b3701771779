//! Investable universes: index membership and the listed-company register.
//!
//! [`Universe`] abstracts "which symbols are in scope". Aggregation restricts
//! companies to a universe before grouping them into sectors.

pub mod listed;

pub use listed::ListedUniverse;

use karachi_data::IndexSnapshot;
use std::collections::HashSet;

/// Trait for symbol universes.
pub trait Universe {
    /// Get all symbols in the universe.
    fn symbols(&self) -> Vec<String>;

    /// Check if a symbol is in the universe.
    fn contains(&self, symbol: &str) -> bool {
        self.symbols().iter().any(|s| s == symbol)
    }

    /// Get the number of constituents.
    fn size(&self) -> usize {
        self.symbols().len()
    }
}

impl Universe for HashSet<String> {
    fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.iter().cloned().collect();
        symbols.sort();
        symbols
    }

    fn contains(&self, symbol: &str) -> bool {
        Self::contains(self, symbol)
    }

    fn size(&self) -> usize {
        self.len()
    }
}

impl Universe for IndexSnapshot {
    fn symbols(&self) -> Vec<String> {
        self.membership.symbols()
    }

    fn contains(&self, symbol: &str) -> bool {
        self.membership.contains(symbol)
    }

    fn size(&self) -> usize {
        self.len()
    }
}

impl Universe for ListedUniverse {
    fn symbols(&self) -> Vec<String> {
        self.symbols()
    }

    fn contains(&self, symbol: &str) -> bool {
        self.company(symbol).is_some()
    }

    fn size(&self) -> usize {
        self.companies().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use karachi_data::{IndexCode, IndexMetric};

    #[test]
    fn test_snapshot_universe() {
        let snapshot = IndexSnapshot::from_metrics(
            IndexCode::Kse30,
            ["UBL", "HBL"]
                .iter()
                .map(|s| IndexMetric {
                    symbol: s.to_string(),
                    price: 1.0,
                    change_percent: 0.0,
                    volume: 0,
                    market_cap_millions: 1.0,
                })
                .collect(),
        );

        assert!(Universe::contains(&snapshot, "HBL"));
        assert!(!Universe::contains(&snapshot, "LUCK"));
        assert_eq!(Universe::size(&snapshot), 2);
        assert_eq!(Universe::symbols(&snapshot), vec!["HBL", "UBL"]);
    }

    #[test]
    fn test_set_universe() {
        let set: HashSet<String> = ["OGDC".to_string()].into_iter().collect();
        assert!(Universe::contains(&set, "OGDC"));
        assert_eq!(Universe::size(&set), 1);
    }
}
