//! Listings page (`/listings-table/main/nc`) parser.
//!
//! Column layout as of the 2025 portal: symbol, name, sector, clearing type,
//! shares, free float, listed in.

use crate::extract::{EmptyReason, Extracted, parse_count};
use crate::index::IndexCode;
use crate::model::CompanyIdentity;
use std::collections::HashSet;

/// Cells a row needs before it is interpreted.
pub const MIN_COLUMNS: usize = 6;

const SYMBOL: usize = 0;
const NAME: usize = 1;
const SECTOR: usize = 2;
const CLEARING: usize = 3;
const SHARES: usize = 4;
const FREE_FLOAT: usize = 5;
const LISTED_IN: usize = 6;

/// Parse company identities from listings rows.
///
/// Short rows and rows with an empty symbol or name are skipped. A symbol
/// seen twice keeps its first row.
pub fn parse_companies(rows: &[Vec<String>]) -> Vec<CompanyIdentity> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|row| parse_row(row))
        .filter(|company| seen.insert(company.symbol.clone()))
        .collect()
}

/// Like [`parse_companies`], tagging an empty result with a reason.
pub fn parse_companies_tagged(rows: &[Vec<String>]) -> Extracted<Vec<CompanyIdentity>> {
    if rows.is_empty() {
        return Extracted::Empty(EmptyReason::NoRows);
    }
    Extracted::from_vec(
        parse_companies(rows),
        EmptyReason::NoValidRows {
            inspected: rows.len(),
        },
    )
}

/// Keep companies whose listed-in cell mentions `index`.
pub fn filter_by_index(companies: Vec<CompanyIdentity>, index: IndexCode) -> Vec<CompanyIdentity> {
    companies
        .into_iter()
        .filter(|c| index.listed_in(&c.listed_in))
        .collect()
}

/// Uppercase alphanumeric symbol from a decorated cell.
pub fn clean_symbol(cell: &str) -> String {
    cell.chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_uppercase()
}

fn parse_row(row: &[String]) -> Option<CompanyIdentity> {
    if row.len() < MIN_COLUMNS {
        return None;
    }

    let symbol = clean_symbol(&row[SYMBOL]);
    let name = row[NAME].trim();
    if symbol.is_empty() || name.is_empty() {
        return None;
    }

    Some(CompanyIdentity {
        symbol,
        name: name.to_string(),
        sector: row[SECTOR].trim().to_string(),
        clearing_type: row[CLEARING].trim().to_string(),
        shares_outstanding: parse_count(&row[SHARES]),
        free_float: parse_count(&row[FREE_FLOAT]),
        listed_in: row.get(LISTED_IN).map(|s| s.trim().to_string()).unwrap_or_default(),
    })
}
