//! Helpers for the free-text spec fields stored in the catalog.
//!
//! RAM and storage options arrive as text such as `"8GB / 12GB"` or
//! `"256GB, 512GB, 1TB"`. Values without a unit are read as GB.

use std::sync::LazyLock;

use regex::Regex;

static CAPACITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(tb|gb)?").expect("capacity pattern is valid")
});

/// Every capacity value in the text, converted to GB.
pub fn capacity_values_gb(text: &str) -> Vec<f64> {
    CAPACITY_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let value: f64 = caps.get(1)?.as_str().parse().ok()?;
            let unit = caps.get(2).map(|m| m.as_str().to_ascii_lowercase());
            Some(match unit.as_deref() {
                Some("tb") => value * 1024.0,
                _ => value,
            })
        })
        .collect()
}

/// The largest capacity mentioned, in GB.
pub fn max_capacity_gb(text: &str) -> Option<f64> {
    capacity_values_gb(text).into_iter().reduce(f64::max)
}

/// Whether any listed option equals `gb` exactly.
pub fn offers_capacity(text: &str, gb: f64) -> bool {
    capacity_values_gb(text)
        .iter()
        .any(|value| (value - gb).abs() < f64::EPSILON)
}

/// Thousands-separated integer, e.g. `1,299`.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round() as i64;
    group_thousands(&rounded.unsigned_abs().to_string(), rounded < 0)
}

/// Currency display with two decimals, e.g. `RM1,299.00`.
pub fn format_price(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let whole = cents.unsigned_abs() / 100;
    let frac = cents.unsigned_abs() % 100;
    format!(
        "RM{}.{:02}",
        group_thousands(&whole.to_string(), cents < 0),
        frac
    )
}

fn group_thousands(digits: &str, negative: bool) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
