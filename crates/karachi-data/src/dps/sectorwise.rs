//! Sector summary page (`/sector-summary/sectorwise`) parser.
//!
//! Columns: sector, advance, decline, unchanged, turnover, market cap (B).

use crate::extract::{EmptyReason, Extracted, parse_count, parse_number};
use crate::model::SectorActivity;

/// Cells a row needs before it is interpreted.
pub const MIN_COLUMNS: usize = 4;

/// Parse sector activity rows; numeric misses read as zero.
pub fn parse_sector_activity(rows: &[Vec<String>]) -> Extracted<Vec<SectorActivity>> {
    if rows.is_empty() {
        return Extracted::Empty(EmptyReason::NoRows);
    }

    let parsed = rows
        .iter()
        .filter(|row| row.len() >= MIN_COLUMNS)
        .filter(|row| !row[0].trim().is_empty())
        .map(|row| SectorActivity {
            name: row[0].trim().to_string(),
            advance: count(&row[1]),
            decline: count(&row[2]),
            unchanged: count(&row[3]),
            turnover: row.get(4).and_then(|c| parse_number(c)).unwrap_or(0.0),
            market_cap_billions: row.get(5).and_then(|c| parse_number(c)).unwrap_or(0.0),
        })
        .collect();

    Extracted::from_vec(
        parsed,
        EmptyReason::NoValidRows {
            inspected: rows.len(),
        },
    )
}

fn count(cell: &str) -> u32 {
    u32::try_from(parse_count(cell)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_rows() {
        let rows = vec![
            row(&["COMMERCIAL BANKS", "12", "5", "3", "45,120,000", "2,850.12"]),
            row(&["CEMENT", "8", "9", "1"]),
            row(&["", "1", "1", "1"]),
            row(&["TOTAL"]),
        ];
        let Extracted::Data(activity) = parse_sector_activity(&rows) else {
            panic!("expected data");
        };
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[0].advance, 12);
        assert_relative_eq!(activity[0].turnover, 45_120_000.0);
        assert_relative_eq!(activity[0].market_cap_billions, 2_850.12);
        assert_eq!(activity[1].name, "CEMENT");
        assert_relative_eq!(activity[1].turnover, 0.0);
    }

    #[test]
    fn test_empty_rows() {
        assert_eq!(
            parse_sector_activity(&[]).empty_reason(),
            Some(&EmptyReason::NoRows)
        );
    }
}
