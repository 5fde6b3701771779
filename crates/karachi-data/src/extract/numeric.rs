//! Lenient number parsing for portal cells.

/// Parse a decimal from cell text.
///
/// Strips thousands separators, percent signs, a leading `Rs.` and
/// surrounding parentheses (read as negative). Returns `None` when nothing
/// numeric remains.
pub fn parse_number(text: &str) -> Option<f64> {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("Rs.") {
        s = rest.trim_start();
    }

    let negative_parens = s.starts_with('(') && s.ends_with(')');
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, ',' | '%' | '(' | ')') && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if negative_parens { -value.abs() } else { value })
}

/// Parse a share count, stripping thousands separators. Unparsable cells are 0.
pub fn parse_count(text: &str) -> u64 {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned
        .parse::<u64>()
        .ok()
        .or_else(|| {
            cleaned
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v as u64)
        })
        .unwrap_or(0)
}

/// All decimal numbers appearing in `text`, in order.
///
/// Used for range cells such as `98.25 — 158.75`.
pub fn numbers_in(text: &str) -> Vec<f64> {
    text.split(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .filter_map(parse_number)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("142.50", Some(142.5))]
    #[case("1,234,567.89", Some(1_234_567.89))]
    #[case("2.10%", Some(2.1))]
    #[case("-0.85%", Some(-0.85))]
    #[case("(1.25)", Some(-1.25))]
    #[case("Rs.285.75", Some(285.75))]
    #[case(" 6.2 ", Some(6.2))]
    #[case("", None)]
    #[case("-", None)]
    #[case("N/A", None)]
    fn test_parse_number(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_number(input), expected);
    }

    #[rstest]
    #[case("3,400,000,000", 3_400_000_000)]
    #[case("1,020,000", 1_020_000)]
    #[case("12.0", 12)]
    #[case("", 0)]
    #[case("n/a", 0)]
    #[case("-5", 0)]
    fn test_parse_count(#[case] input: &str, #[case] expected: u64) {
        assert_eq!(parse_count(input), expected);
    }

    #[test]
    fn test_numbers_in_range() {
        assert_eq!(numbers_in("98.25 — 158.75"), vec![98.25, 158.75]);
        assert_eq!(numbers_in("1,020.50 - 2,000.00"), vec![1020.5, 2000.0]);
        assert!(numbers_in("—").is_empty());
    }
}
