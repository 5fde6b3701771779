//! Company detail page (`/company/{symbol}`) parser.
//!
//! The page lays out statistics as `.stats_item` blocks, each holding a
//! `.stats_label` and a `.stats_value`. Blocks are matched by label text; the
//! first match wins since later blocks repeat the figures for other markets.

use crate::extract::numeric::numbers_in;
use crate::extract::table::{clean_text, normalize};
use crate::extract::{EmptyReason, Extracted, parse_number};
use crate::model::Fundamentals;
use scraper::{Html, Selector};

/// Label fragment of the trailing P/E block.
pub const PE_LABEL: &str = "P/E";

/// Label fragment of the market cap block; the value is in thousands.
pub const MARKET_CAP_LABEL: &str = "MARKET CAP";

/// Label fragment of the 52-week range block.
pub const RANGE_LABEL: &str = "52-WEEK";

/// Parse fundamentals from a detail page.
///
/// Each field is extracted independently; a missing label or unparsable value
/// leaves that field `None`. Tagged empty when nothing at all was found.
pub fn parse_fundamentals(symbol: &str, html: &str) -> Extracted<Fundamentals> {
    let document = Html::parse_document(html);
    let stats = stat_blocks(&document);

    let range = stat_value(&stats, RANGE_LABEL).map(|v| numbers_in(&v));
    let (low_52w, high_52w) = match range.as_deref() {
        Some([low, high, ..]) => (Some(low.min(*high)), Some(low.max(*high))),
        _ => (None, None),
    };

    let fundamentals = Fundamentals {
        symbol: symbol.to_string(),
        pe: stat_value(&stats, PE_LABEL).and_then(|v| parse_number(&v)),
        market_cap_millions: stat_value(&stats, MARKET_CAP_LABEL)
            .and_then(|v| parse_number(&v))
            .map(|thousands| thousands / 1000.0),
        price: first_text(&document, ".quote__close").and_then(|v| parse_number(&v)),
        change_percent: first_text(&document, ".change__percent")
            .and_then(|v| parse_number(&v.replace(['(', ')'], ""))),
        high_52w,
        low_52w,
        description: meta_description(&document),
    };

    if fundamentals.is_empty() {
        Extracted::Empty(EmptyReason::NoLabels)
    } else {
        Extracted::Data(fundamentals)
    }
}

/// (label, value) pairs of all statistic blocks, labels uppercased.
fn stat_blocks(document: &Html) -> Vec<(String, String)> {
    let (Ok(item_sel), Ok(label_sel), Ok(value_sel)) = (
        Selector::parse(".stats_item"),
        Selector::parse(".stats_label"),
        Selector::parse(".stats_value"),
    ) else {
        return Vec::new();
    };

    document
        .select(&item_sel)
        .filter_map(|block| {
            let label = block.select(&label_sel).next().map(clean_text)?;
            let value = block.select(&value_sel).next().map(clean_text)?;
            Some((label.to_uppercase(), value))
        })
        .collect()
}

fn stat_value(stats: &[(String, String)], fragment: &str) -> Option<String> {
    stats
        .iter()
        .find(|(label, _)| label.contains(fragment))
        .map(|(_, value)| value.clone())
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(clean_text)
        .filter(|s| !s.is_empty())
}

fn meta_description(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(normalize)
        .filter(|s| !s.is_empty())
}
