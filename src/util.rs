// Utility helpers for parsing, date conversion and number formatting.
//
// This module centralizes all the "dirty" CSV/number/date handling so the
// rest of the code can assume clean, typed values.
use chrono::{Duration, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Spreadsheet serial day 0 in the 1900 date system.
pub const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports.
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace and strips thousands separators like `","`.
/// - Rejects values that contain alphabetic characters other than an
///   exponent marker, so `"1.5e3"` parses but `"n/a"` and `"inf"` do not.
/// - Returns `None` for anything that cannot be parsed or is not finite.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer parse that also accepts a float-formatted cell such as `"2023.0"`,
/// truncating toward zero.
pub fn parse_i32_safe(s: Option<&str>) -> Option<i32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i32>() {
        return Some(v);
    }
    let v = parse_f64_safe(Some(s))?.trunc();
    if v < i32::MIN as f64 || v > i32::MAX as f64 {
        return None;
    }
    Some(v as i32)
}

/// Convert a spreadsheet serial day count (day 0 = 1899-12-30) to a date.
///
/// Equivalent to `(serial - 25569) * 86400` seconds after the Unix epoch,
/// read back as a UTC calendar date. Fractional days are truncated.
pub fn serial_to_date(serial: i64) -> Option<NaiveDate> {
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_signed(Duration::try_days(serial)?)
}

pub fn parse_serial_date(s: Option<&str>) -> Option<NaiveDate> {
    let serial = parse_f64_safe(s)?.trunc();
    serial_to_date(serial as i64)
}

/// Round half up (toward positive infinity), matching how the dashboard
/// rounds percentages for display.
pub fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    // Sign is decided after rounding so -0.4 prints as 0, not -0.
    let neg = n < 0.0 && s.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Whole-dollar currency, e.g. `$1,234,568` or `-$12`.
pub fn format_currency(n: f64) -> String {
    let s = format_number(n, 0);
    match s.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", s),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

// `display_with` adapters for tabled previews.

pub fn display_money(v: &f64) -> String {
    format_currency(*v)
}

pub fn display_ratio(v: &f64) -> String {
    format_number(*v, 2)
}

pub fn display_percent(v: &Option<i64>) -> String {
    match v {
        Some(p) => format!("{}%", p),
        None => "n/a".to_string(),
    }
}

pub fn display_date(v: &Option<NaiveDate>) -> String {
    match v {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "n/a".to_string(),
    }
}
