//! Index constituents page (`/indices/{code}`) parser.
//!
//! Layout v2025.1. The page has no semantic markup for its numeric columns,
//! so values are read by position among the right-aligned cells of a row:
//!
//! | position | column            |
//! |----------|-------------------|
//! | 0        | LDCP              |
//! | 1        | current price     |
//! | 2        | change            |
//! | 3        | change (%)        |
//! | 4, 5     | weight, points    |
//! | 6        | volume            |
//! | 7        | free float        |
//! | last     | market cap (M)    |
//!
//! If the portal reorders these columns the fixture test in
//! `tests/fixtures/index_kse100.html` must fail; update the constants below
//! together with the fixture.

use super::listings::clean_symbol;
use crate::extract::{EmptyReason, Extracted, Row, extract_table, parse_count, parse_number};
use crate::index::IndexCode;
use crate::model::{IndexMetric, IndexSnapshot};

/// Position of the current price among right-aligned cells.
pub const PRICE_POSITION: usize = 1;

/// Position of the daily change percent among right-aligned cells.
pub const CHANGE_PERCENT_POSITION: usize = 3;

/// Position of the traded volume among right-aligned cells.
pub const VOLUME_POSITION: usize = 6;

/// Right-aligned cells a row needs; market cap is the last of them.
pub const MIN_NUMERIC_CELLS: usize = 5;

/// Parse an index page into a snapshot.
pub fn parse_index_page(index: IndexCode, html: &str) -> Extracted<IndexSnapshot> {
    let rows = match extract_table(html) {
        Extracted::Data(rows) => rows,
        Extracted::Empty(reason) => return Extracted::Empty(reason),
    };

    let inspected = rows.len();
    let metrics: Vec<IndexMetric> = rows.iter().filter_map(parse_row).collect();

    match Extracted::from_vec(metrics, EmptyReason::NoValidRows { inspected }) {
        Extracted::Data(metrics) => Extracted::Data(IndexSnapshot::from_metrics(index, metrics)),
        Extracted::Empty(reason) => Extracted::Empty(reason),
    }
}

/// Parse one constituent row; `None` when the row has no symbol or too few
/// numeric cells. Unparsable numbers read as zero, as does the volume of a
/// row too short to carry it.
pub fn parse_row(row: &Row) -> Option<IndexMetric> {
    let symbol = row
        .cells
        .iter()
        .find_map(|c| c.emphasized.as_deref())
        .map(clean_symbol)
        .filter(|s| !s.is_empty())?;

    let numeric = row.right_aligned();
    if numeric.len() < MIN_NUMERIC_CELLS {
        return None;
    }

    let value = |pos: usize| parse_number(&numeric[pos].text).unwrap_or(0.0);
    let last = numeric.len() - 1;

    let volume = if VOLUME_POSITION < last {
        parse_count(&numeric[VOLUME_POSITION].text)
    } else {
        0
    };

    Some(IndexMetric {
        symbol,
        price: value(PRICE_POSITION),
        change_percent: value(CHANGE_PERCENT_POSITION),
        volume,
        market_cap_millions: value(last),
    })
}
