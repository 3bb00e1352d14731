//! Display formatting for numbers, money, dates and names.
use chrono::DateTime;
use chrono::NaiveDate;

/// Placeholder shown for a missing date.
pub const MISSING: &str = "-";

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_fixed(value: f64, min_frac: usize, max_frac: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", max_frac, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let mut frac = frac_part.to_string();
    while frac.len() > min_frac && frac.ends_with('0') {
        frac.pop();
    }
    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{}", group_thousands(int_part))
    } else {
        format!("{sign}{}.{frac}", group_thousands(int_part))
    }
}

/// Grouped thousands with up to three fraction digits: `1234.5` → `"1,234.5"`.
pub fn format_number(value: f64) -> String {
    format_fixed(value, 0, 3)
}

/// Money in a currency: `format_currency(1234.5, "USD")` → `"$1,234.50"`.
///
/// Unknown currency codes are written before the amount.
pub fn format_currency(value: f64, currency: &str) -> String {
    let (symbol, digits) = match currency.to_ascii_uppercase().as_str() {
        "USD" => ("$", 2),
        "EUR" => ("€", 2),
        "GBP" => ("£", 2),
        "JPY" => ("¥", 0),
        _ => ("", 2),
    };
    let amount = format_fixed(value.abs(), digits, digits);
    let sign = if value < 0.0 && amount.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    if symbol.is_empty() {
        format!("{sign}{} {amount}", currency.to_ascii_uppercase())
    } else {
        format!("{sign}{symbol}{amount}")
    }
}

/// Parses an RFC 3339 timestamp or a `YYYY-MM-DD` date, ignoring any time part after `T` or
/// a space.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    let date = s.split(['T', ' ']).next()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Medium date: `"2024-01-05"` → `"Jan 5, 2024"`.
///
/// Empty input becomes [`MISSING`]; unparseable input is shown unchanged.
pub fn format_date(s: &str) -> String {
    if s.trim().is_empty() {
        return MISSING.to_string();
    }
    match parse_date(s) {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => s.to_string(),
    }
}

/// Up to two uppercase initials from the first letters of the name's words.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}
