//! Table body extraction.
//!
//! Finds the first `<tbody>` in a document and returns its rows in order.
//! No column layout is assumed; callers check the cell count themselves and
//! skip rows that are too short.

use super::{EmptyReason, Extracted};
use scraper::{ElementRef, Html, Selector};

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    /// Cleaned text content.
    pub text: String,
    /// Text of the first `<strong>`, `<b>` or `<em>` inside the cell.
    pub emphasized: Option<String>,
    /// Whether the cell is marked right-aligned (numeric column).
    pub right_aligned: bool,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// Cells in document order.
    pub cells: Vec<Cell>,
}

impl Row {
    /// Cell texts in order.
    pub fn texts(&self) -> Vec<String> {
        self.cells.iter().map(|c| c.text.clone()).collect()
    }

    /// Right-aligned cells in order.
    pub fn right_aligned(&self) -> Vec<&Cell> {
        self.cells.iter().filter(|c| c.right_aligned).collect()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Rows of the first table body as plain text cells.
///
/// Returns an empty vector when the markup has no table body.
pub fn extract_rows(html: &str) -> Vec<Vec<String>> {
    extract_row_cells(html)
        .into_iter()
        .map(|row| row.texts())
        .collect()
}

/// Rows of the first table body with per-cell markup hints.
pub fn extract_row_cells(html: &str) -> Vec<Row> {
    extract_table(html).unwrap_or_default()
}

/// Rows of the first table body, tagged empty with a reason when absent.
pub fn extract_table(html: &str) -> Extracted<Vec<Row>> {
    let Ok(tbody) = Selector::parse("tbody") else {
        return Extracted::Empty(EmptyReason::NoTable);
    };

    let document = Html::parse_document(html);
    let Some(body) = document.select(&tbody).next() else {
        return Extracted::Empty(EmptyReason::NoTable);
    };

    let rows: Vec<Row> = child_elements(body, &["tr"])
        .map(|tr| Row {
            cells: child_elements(tr, &["td", "th"]).map(read_cell).collect(),
        })
        .collect();

    Extracted::from_vec(rows, EmptyReason::NoRows)
}

/// Cleaned text of an element: entities decoded, whitespace collapsed.
pub fn clean_text(element: ElementRef<'_>) -> String {
    normalize(&element.text().collect::<String>())
}

/// Collapse whitespace (including non-breaking spaces) and trim.
pub fn normalize(raw: &str) -> String {
    raw.replace("&nbsp;", " ")
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn child_elements<'a>(
    parent: ElementRef<'a>,
    names: &'a [&'a str],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |e| names.contains(&e.value().name()))
}

fn read_cell(td: ElementRef<'_>) -> Cell {
    let emphasized = Selector::parse("strong, b, em")
        .ok()
        .and_then(|sel| td.select(&sel).next())
        .map(clean_text)
        .filter(|s| !s.is_empty());

    Cell {
        text: clean_text(td),
        emphasized,
        right_aligned: is_right_aligned(td),
    }
}

fn is_right_aligned(element: ElementRef<'_>) -> bool {
    let value = element.value();
    value.classes().any(|c| c == "right" || c == "text-right")
        || value
            .attr("align")
            .is_some_and(|a| a.eq_ignore_ascii_case("right"))
        || value.attr("style").is_some_and(|s| {
            s.replace(' ', "")
                .to_ascii_lowercase()
                .contains("text-align:right")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <html><body>
        <table class="tbl">
          <thead><tr><th>SYMBOL</th><th>NAME</th><th>PRICE</th></tr></thead>
          <tbody>
            <tr><td><a href="/company/HBL"><strong>HBL</strong></a></td><td>Habib&nbsp;Bank   Limited</td><td class="right">142.50</td></tr>
            <tr><td><strong>UBL</strong></td><td>United Bank Limited</td><td align="right">285.75</td></tr>
            <tr><td>short</td></tr>
          </tbody>
        </table>
        <table><tbody><tr><td>second table</td></tr></tbody></table>
        </body></html>
    "#;

    #[test]
    fn test_row_count_matches_first_body() {
        let rows = extract_rows(SAMPLE);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_cells_are_stripped_of_markup() {
        let rows = extract_rows(SAMPLE);
        assert_eq!(rows[0], vec!["HBL", "Habib Bank Limited", "142.50"]);
        assert_eq!(rows[2], vec!["short"]);
        for row in &rows {
            for cell in row {
                assert!(!cell.contains('<'));
                assert!(!cell.contains("&nbsp;"));
            }
        }
    }

    #[test]
    fn test_cell_hints() {
        let rows = extract_row_cells(SAMPLE);
        assert_eq!(rows[0].cells[0].emphasized.as_deref(), Some("HBL"));
        assert!(rows[0].cells[2].right_aligned);
        assert!(rows[1].cells[2].right_aligned);
        assert!(!rows[1].cells[1].right_aligned);
        assert_eq!(rows[0].right_aligned().len(), 1);
    }

    #[test]
    fn test_missing_body_is_empty_not_error() {
        assert!(extract_rows("<div>no table here</div>").is_empty());
        assert_eq!(
            extract_table("<p>nothing</p>").empty_reason(),
            Some(&EmptyReason::NoTable)
        );
    }

    #[test]
    fn test_empty_body_reason() {
        let html = "<table><tbody></tbody></table>";
        assert_eq!(
            extract_table(html).empty_reason(),
            Some(&EmptyReason::NoRows)
        );
    }

    #[test]
    fn test_nested_table_rows_not_flattened() {
        let html = r#"<table><tbody>
            <tr><td>outer<table><tbody><tr><td>inner</td></tr></tbody></table></td></tr>
            <tr><td>second</td></tr>
        </tbody></table>"#;
        let rows = extract_rows(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["second"]);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  a\u{a0}\n b  "), "a b");
        assert_eq!(normalize("x&nbsp;y"), "x y");
    }
}
