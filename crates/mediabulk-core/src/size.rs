//! Human-readable byte sizes.
//!
//! Limits are configured as strings such as `2M`, `32 MB` or `1.5G`. Units are
//! binary multiples keyed on the first unit letter (`b`, `k`, `m`, `g`, `t`,
//! `p`, `e`, `z`, `y`); a bare number is a byte count.

const KILOBYTE: f64 = 1024.0;
const UNIT_LETTERS: &str = "bkmgtpezy";
const DISPLAY_UNITS: [&str; 8] = ["KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizeParseError {
    #[error("size '{0}' has no numeric part")]
    MissingNumber(String),

    #[error("size '{0}' has a malformed numeric part")]
    InvalidNumber(String),

    #[error("size '{0}' does not fit in 64 bits")]
    Overflow(String),
}

/// Convert a human-readable size into a byte count.
///
/// Every character that is neither a digit nor `.` is ignored for the number,
/// and only unit letters are kept for the multiplier, so `"32 MB"`, `"32M"`
/// and `"32mb"` are all `33_554_432`.
pub fn parse_size(size: &str) -> Result<u64, SizeParseError> {
    let unit = size
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .find(|c| UNIT_LETTERS.contains(*c));
    let number: String = size
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if !number.chars().any(|c| c.is_ascii_digit()) {
        return Err(SizeParseError::MissingNumber(size.to_string()));
    }

    let value: f64 = number
        .parse()
        .map_err(|_| SizeParseError::InvalidNumber(size.to_string()))?;

    let exponent = unit
        .and_then(|u| UNIT_LETTERS.find(u))
        .unwrap_or(0) as i32;
    let bytes = (value * KILOBYTE.powi(exponent)).round();

    if !bytes.is_finite() || bytes > u64::MAX as f64 {
        return Err(SizeParseError::Overflow(size.to_string()));
    }

    Ok(bytes as u64)
}

/// Render a byte count for display, e.g. `512 bytes`, `1.5 KB`, `32 MB`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 1 {
        return "1 byte".to_string();
    }
    if (bytes as f64) < KILOBYTE {
        return format!("{} bytes", bytes);
    }

    let mut size = bytes as f64 / KILOBYTE;
    let mut unit = DISPLAY_UNITS[0];
    for next in DISPLAY_UNITS.iter().skip(1) {
        if round2(size) < KILOBYTE {
            break;
        }
        size /= KILOBYTE;
        unit = next;
    }

    format!("{} {}", trim_decimal(round2(size)), unit)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn trim_decimal(value: f64) -> String {
    let rendered = format!("{:.2}", value);
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
