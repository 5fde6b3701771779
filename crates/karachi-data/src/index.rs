//! Benchmark index codes published by the PSX data portal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Market indices with a constituents page on the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IndexCode {
    /// KSE-100, the 100-symbol benchmark
    Kse100,

    /// KSE-30
    Kse30,

    /// KMI-30 (shariah compliant)
    Kmi30,

    /// KMI All Share
    KmiAllShare,

    /// All Share index
    AllShare,

    /// Banks tradable index
    Bkti,

    /// Oil & gas tradable index
    Ogti,

    /// PSX dividend 20
    PsxDiv20,
}

impl IndexCode {
    /// Returns all supported indices.
    pub fn all() -> Vec<Self> {
        vec![
            Self::Kse100,
            Self::Kse30,
            Self::Kmi30,
            Self::KmiAllShare,
            Self::AllShare,
            Self::Bkti,
            Self::Ogti,
            Self::PsxDiv20,
        ]
    }

    /// Path segment used by `/indices/{code}`.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Kse100 => "KSE100",
            Self::Kse30 => "KSE30",
            Self::Kmi30 => "KMI30",
            Self::KmiAllShare => "KMIALLSHR",
            Self::AllShare => "ALLSHR",
            Self::Bkti => "BKTI",
            Self::Ogti => "OGTI",
            Self::PsxDiv20 => "PSXDIV20",
        }
    }

    /// Human readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Kse100 => "KSE-100",
            Self::Kse30 => "KSE-30",
            Self::Kmi30 => "KMI-30",
            Self::KmiAllShare => "KMI All Share",
            Self::AllShare => "All Share",
            Self::Bkti => "Banks Tradable",
            Self::Ogti => "Oil & Gas Tradable",
            Self::PsxDiv20 => "PSX Dividend 20",
        }
    }

    /// Spellings that may appear in a listed-in cell.
    pub const fn spellings(&self) -> &'static [&'static str] {
        match self {
            Self::Kse100 => &["KSE100", "KSE-100"],
            Self::Kse30 => &["KSE30", "KSE-30"],
            Self::Kmi30 => &["KMI30", "KMI-30"],
            Self::KmiAllShare => &["KMIALLSHR", "KMI-ALLSHR"],
            Self::AllShare => &["ALLSHR", "ALL-SHR"],
            Self::Bkti => &["BKTI"],
            Self::Ogti => &["OGTI"],
            Self::PsxDiv20 => &["PSXDIV20", "PSX-DIV20"],
        }
    }

    /// Whether a listed-in cell mentions this index.
    ///
    /// Case-insensitive match on any spelling. A match must not touch an
    /// alphanumeric character on either side, and must not lie inside a
    /// longer spelling of another index (`ALLSHR` inside `KMI-ALLSHR`).
    pub fn listed_in(&self, cell: &str) -> bool {
        let cell = cell.to_uppercase();
        self.spellings().iter().any(|spelling| {
            cell.match_indices(spelling).any(|(start, _)| {
                let end = start + spelling.len();
                token_bounded(&cell, start, end) && !covered_by_longer_spelling(&cell, start, end)
            })
        })
    }
}

fn token_bounded(cell: &str, start: usize, end: usize) -> bool {
    let before = cell[..start].chars().next_back();
    let after = cell[end..].chars().next();
    !before.is_some_and(|c| c.is_ascii_alphanumeric())
        && !after.is_some_and(|c| c.is_ascii_alphanumeric())
}

fn covered_by_longer_spelling(cell: &str, start: usize, end: usize) -> bool {
    IndexCode::all()
        .into_iter()
        .flat_map(|idx| idx.spellings().iter())
        .filter(|longer| longer.len() > end - start)
        .any(|longer| {
            cell.match_indices(longer)
                .any(|(at, _)| at <= start && at + longer.len() >= end)
        })
}

impl fmt::Display for IndexCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when an index code is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown index code: {0}")]
pub struct UnknownIndex(pub String);

impl FromStr for IndexCode {
    type Err = UnknownIndex;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::all()
            .into_iter()
            .find(|idx| {
                idx.spellings().iter().any(|sp| *sp == wanted)
                    || idx.name().to_uppercase() == wanted
            })
            .ok_or_else(|| UnknownIndex(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("KSE100", IndexCode::Kse100)]
    #[case("kse-100", IndexCode::Kse100)]
    #[case(" KMI30 ", IndexCode::Kmi30)]
    #[case("All Share", IndexCode::AllShare)]
    #[case("psxdiv20", IndexCode::PsxDiv20)]
    fn test_parse_spellings(#[case] input: &str, #[case] expected: IndexCode) {
        assert_eq!(input.parse::<IndexCode>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown() {
        assert!("NIFTY50".parse::<IndexCode>().is_err());
    }

    #[test]
    fn test_listed_in_substring() {
        assert!(IndexCode::Kse100.listed_in("KSE100, KSE30, KMI30, ALLSHR"));
        assert!(IndexCode::Kse100.listed_in("kse-100 | allshr"));
        assert!(!IndexCode::Kse30.listed_in("KSE100, ALLSHR"));
    }

    #[rstest]
    #[case(IndexCode::AllShare, "KMIALLSHR", false)]
    #[case(IndexCode::AllShare, "KMI-ALLSHR", false)]
    #[case(IndexCode::AllShare, "KMIALLSHR, ALLSHR", true)]
    #[case(IndexCode::AllShare, "kmi-allshr,allshr", true)]
    #[case(IndexCode::KmiAllShare, "KMIALLSHR", true)]
    #[case(IndexCode::Kse100, "KSE1000", false)]
    #[case(IndexCode::Kse30, "XKSE30", false)]
    #[case(IndexCode::Kmi30, "KSE100|KMI30", true)]
    fn test_listed_in_token_boundaries(
        #[case] index: IndexCode,
        #[case] cell: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(index.listed_in(cell), expected);
    }

    #[test]
    fn test_codes_unique() {
        let all = IndexCode::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.code(), b.code());
            }
        }
    }
}
