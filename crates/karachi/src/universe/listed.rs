//! Listed companies with their published sector labels.

use super::Universe;
use karachi_data::CompanyIdentity;
use std::collections::HashMap;

/// Companies from one listings fetch, indexed by symbol and sector.
#[derive(Debug, Clone, Default)]
pub struct ListedUniverse {
    companies: Vec<CompanyIdentity>,
    by_symbol: HashMap<String, usize>,
}

impl ListedUniverse {
    /// Create a universe; a symbol seen twice keeps its first record.
    pub fn new(companies: Vec<CompanyIdentity>) -> Self {
        let mut universe = Self::default();
        for company in companies {
            if !universe.by_symbol.contains_key(&company.symbol) {
                universe
                    .by_symbol
                    .insert(company.symbol.clone(), universe.companies.len());
                universe.companies.push(company);
            }
        }
        universe
    }

    /// Get all companies in listing order.
    pub fn companies(&self) -> &[CompanyIdentity] {
        &self.companies
    }

    /// Get all symbols in listing order.
    pub fn symbols(&self) -> Vec<String> {
        self.companies.iter().map(|c| c.symbol.clone()).collect()
    }

    /// Look up a company by symbol.
    pub fn company(&self, symbol: &str) -> Option<&CompanyIdentity> {
        self.by_symbol.get(symbol).map(|&i| &self.companies[i])
    }

    /// Get the sector label of a symbol.
    pub fn sector(&self, symbol: &str) -> Option<&str> {
        self.company(symbol).map(|c| c.sector.as_str())
    }

    /// Companies whose sector equals `sector`, ignoring ASCII case.
    pub fn in_sector(&self, sector: &str) -> Vec<&CompanyIdentity> {
        let wanted = sector.trim();
        self.companies
            .iter()
            .filter(|c| c.sector.eq_ignore_ascii_case(wanted))
            .collect()
    }

    /// Companies that belong to `universe`, in listing order.
    pub fn restrict_to(&self, universe: &impl Universe) -> Vec<CompanyIdentity> {
        self.companies
            .iter()
            .filter(|c| universe.contains(&c.symbol))
            .cloned()
            .collect()
    }

    /// Get the count of companies per sector label.
    pub fn sector_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for company in &self.companies {
            *counts.entry(company.sector.as_str()).or_insert(0) += 1;
        }
        counts
    }
}
