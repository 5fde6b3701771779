//! Schema-less extraction of tabular text from portal markup.

pub mod numeric;
pub mod table;

pub use numeric::{parse_count, parse_number};
pub use table::{Cell, Row, extract_row_cells, extract_rows, extract_table};

use std::fmt;

/// Why an extraction produced no data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    /// No table body in the markup.
    NoTable,
    /// A table body was found but it had no rows.
    NoRows,
    /// Rows were present but none survived validation.
    NoValidRows {
        /// Rows inspected.
        inspected: usize,
    },
    /// None of the labelled blocks were present.
    NoLabels,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTable => write!(f, "no table body found"),
            Self::NoRows => write!(f, "table body has no rows"),
            Self::NoValidRows { inspected } => {
                write!(f, "none of {inspected} rows passed validation")
            }
            Self::NoLabels => write!(f, "no labelled statistic found"),
        }
    }
}

/// Result of parsing a page: data, or a reason there was none.
///
/// Transport failures are carried by [`crate::DataError`]; this type keeps
/// "upstream had nothing" apart from "the page could not be fetched".
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    /// Parsed data.
    Data(T),
    /// Nothing usable on the page.
    Empty(EmptyReason),
}

impl<U> Extracted<Vec<U>> {
    /// Wrap rows, tagging them empty with `reason` when there are none.
    pub fn from_vec(items: Vec<U>, reason: EmptyReason) -> Self {
        if items.is_empty() {
            Self::Empty(reason)
        } else {
            Self::Data(items)
        }
    }
}

impl<T> Extracted<T> {
    /// Whether data was extracted.
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    /// The empty reason, if any.
    pub const fn empty_reason(&self) -> Option<&EmptyReason> {
        match self {
            Self::Data(_) => None,
            Self::Empty(reason) => Some(reason),
        }
    }

    /// Map the data.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extracted<U> {
        match self {
            Self::Data(data) => Extracted::Data(f(data)),
            Self::Empty(reason) => Extracted::Empty(reason),
        }
    }

    /// Data, or `T::default()` when empty.
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Self::Data(data) => data,
            Self::Empty(_) => T::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec() {
        let data = Extracted::from_vec(vec![1, 2], EmptyReason::NoRows);
        assert!(data.is_data());

        let empty = Extracted::from_vec(Vec::<i32>::new(), EmptyReason::NoRows);
        assert_eq!(empty.empty_reason(), Some(&EmptyReason::NoRows));
        assert!(empty.unwrap_or_default().is_empty());
    }

    #[test]
    fn test_extract_table_from_module_root() {
        let html = r#"<table><tbody><tr><td><strong>HBL</strong></td><td class="right">1.5</td></tr></tbody></table>"#;
        let rows = extract_table(html).unwrap_or_default();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].right_aligned().len(), 1);

        let missing = extract_table("<p>maintenance</p>");
        assert_eq!(missing.empty_reason(), Some(&EmptyReason::NoTable));
    }

    #[test]
    fn test_reason_display() {
        let reason = EmptyReason::NoValidRows { inspected: 12 };
        assert_eq!(reason.to_string(), "none of 12 rows passed validation");
    }
}
