//! Lenient parsing of timing attribute values.
//!
//! Values follow CSS-ish conventions: a bare number is milliseconds, `ms`
//! and `s` suffixes are honoured, and anything unreadable falls back to a
//! caller-supplied default without complaint. Like decimal parsing in the
//! browser, only the leading numeric prefix is read (`"12px"` is 12).

/// A raw timing value before normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawTime<'a> {
    /// Already numeric; taken as milliseconds.
    Number(f64),
    Text(&'a str),
}

impl<'a> From<&'a str> for RawTime<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for RawTime<'_> {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Normalize a timing value to milliseconds.
///
/// Absent, empty, non-finite or unparseable input yields `fallback_ms`.
pub fn parse_time(raw: Option<RawTime<'_>>, fallback_ms: f64) -> f64 {
    let parsed = match raw {
        None => None,
        Some(RawTime::Number(ms)) => Some(ms),
        Some(RawTime::Text(text)) => parse_text(text),
    };
    parsed.filter(|ms| ms.is_finite()).unwrap_or(fallback_ms)
}

/// [`parse_time`] for an optional attribute string.
pub fn parse_time_attr(raw: Option<&str>, fallback_ms: f64) -> f64 {
    parse_time(raw.map(RawTime::Text), fallback_ms)
}

fn parse_text(text: &str) -> Option<f64> {
    let text = text.trim().to_ascii_lowercase();
    if text.is_empty() {
        return None;
    }
    if let Some(ms) = text.strip_suffix("ms") {
        return leading_float(ms);
    }
    if let Some(secs) = text.strip_suffix('s') {
        return leading_float(secs).map(|s| s * 1000.0);
    }
    leading_float(&text)
}

/// Stagger increment declared on a group marker.
///
/// An empty marker means `default_ms`. The value is read as a leading integer;
/// unreadable values also mean `default_ms`.
pub fn parse_stagger_base(raw: Option<&str>, default_ms: f64) -> f64 {
    match raw.map(str::trim) {
        None | Some("") => default_ms,
        Some(text) => leading_int(text).map(|n| n as f64).unwrap_or(default_ms),
    }
}

/// Longest decimal prefix, e.g. `"1.5e2px"` → 150.
fn leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    text[..end].parse().ok()
}

fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    text[..end].parse().ok()
}
