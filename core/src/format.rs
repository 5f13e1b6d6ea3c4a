//! Display helpers shared by every front end.

/// US-dollar formatting with thousands separators: `-$1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// A fractional rate as a whole percent: `0.08` -> `8%`.
pub fn format_rate(rate: f64) -> String {
    format!("{:.0}%", rate * 100.0)
}

/// Best-effort number parsing for hand-typed and spreadsheet input.
/// Currency signs, percent signs, thousands separators and whitespace are
/// ignored; anything still unparseable is `None`.
pub fn parse_loose_number(input: &str) -> Option<f64> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '$' | '%' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1234567.5), "$1,234,567.50");
        assert_eq!(format_currency(-42.1), "-$42.10");
    }

    #[test]
    fn loose_numbers() {
        assert_eq!(parse_loose_number(" $1,250.75 "), Some(1250.75));
        assert_eq!(parse_loose_number("42%"), Some(42.0));
        assert_eq!(parse_loose_number(""), None);
        assert_eq!(parse_loose_number("n/a"), None);
    }

    #[test]
    fn rate_rounds_to_whole_percent() {
        assert_eq!(format_rate(0.08), "8%");
        assert_eq!(format_rate(0.126), "13%");
    }
}
