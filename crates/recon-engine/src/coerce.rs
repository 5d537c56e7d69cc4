//! Type coercion and value equivalence.
//!
//! `coerce` turns a raw cell into its canonical value under a
//! declared tag; `equivalent` decides whether two raw cells agree
//! under that tag. A conversion failure never aborts anything, it
//! degrades to `Missing` for that cell.

use chrono::{NaiveDate, NaiveDateTime};

use recon_model::{CellValue, TypeTag};

/// Absolute tolerance for numeric agreement.
pub const NUMERIC_TOLERANCE: f64 = 1e-6;

/// Numeric code both systems use for "not recorded".
const MISSING_SENTINEL: f64 = -9999.0;

/// Null-like textual markers, compared case-insensitively.
const MISSING_MARKERS: &[&str] = &["null", "nan", "nat", "na", "none"];

/// True when a raw cell denotes absence: blank, a textual null
/// marker, or the `-9999` missing-data code.
pub fn is_missing_value(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }
    let lowered = trimmed.to_ascii_lowercase();
    if MISSING_MARKERS.contains(&lowered.as_str()) {
        return true;
    }
    matches!(parse_number(trimmed), Some(v) if v == MISSING_SENTINEL)
}

fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Round to `digits` decimal places, ties to even.
fn round_to(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round_ties_even() / scale
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%Y%m%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y"];

/// Parse a timestamp from the formats both exports are known to use.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return parsed.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Compact timestamp form used for cross-system comparison.
pub fn format_compact(value: &NaiveDateTime) -> String {
    value.format("%Y%m%d %H:%M").to_string()
}

/// Locale display form used in downstream import artifacts.
pub fn format_display(value: &NaiveDateTime) -> String {
    value.format("%d.%m.%Y %H:%M:%S").to_string()
}

fn coerce_bool(value: &str) -> CellValue {
    if let Some(number) = parse_number(value) {
        let label = if number == 0.0 { "no" } else { "yes" };
        return CellValue::Text(label.to_string());
    }
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "t" => CellValue::Text("yes".to_string()),
        "false" | "no" | "n" | "f" => CellValue::Text("no".to_string()),
        _ => CellValue::Missing,
    }
}

/// Convert a raw cell to its canonical value under `tag`.
pub fn coerce(value: &str, tag: TypeTag) -> CellValue {
    if is_missing_value(value) {
        return CellValue::Missing;
    }
    match tag {
        // Truncation, not rounding: "123.5" parses as int 123.
        TypeTag::Int => match parse_number(value) {
            Some(number) => CellValue::Int(number.trunc() as i64),
            None => CellValue::Missing,
        },
        TypeTag::Float => match parse_number(value) {
            Some(number) => CellValue::Float(number),
            None => CellValue::Missing,
        },
        TypeTag::FloatN(digits) => match parse_number(value) {
            Some(number) => CellValue::Float(round_to(number, digits)),
            None => CellValue::Missing,
        },
        TypeTag::Bool => coerce_bool(value),
        TypeTag::Date => match parse_datetime(value) {
            Some(parsed) => CellValue::Text(format_compact(&parsed)),
            None => CellValue::Missing,
        },
        TypeTag::Str => CellValue::Text(value.trim().to_string()),
    }
}

fn text_equal_relaxed(a: &str, b: &str) -> bool {
    // Values that are numbers on both sides agree within tolerance
    // even when rendered differently ("123" vs "123.0").
    if let (Some(left), Some(right)) = (parse_number(a), parse_number(b)) {
        return (left - right).abs() <= NUMERIC_TOLERANCE;
    }
    // Registry exports carry umlauts, so fold case beyond ASCII.
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Equivalence of two canonical values under `tag`.
///
/// Two absent values agree; one absent value never agrees with a
/// present one (which side is absent matters for statistics, not for
/// equivalence itself).
pub fn equivalent_values(a: &CellValue, b: &CellValue, tag: TypeTag) -> bool {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => return true,
        (false, false) => {}
        _ => return false,
    }
    match tag {
        TypeTag::Int | TypeTag::Float | TypeTag::FloatN(_) => match (a.as_f64(), b.as_f64()) {
            (Some(left), Some(right)) => (left - right).abs() <= NUMERIC_TOLERANCE,
            _ => a.to_string() == b.to_string(),
        },
        TypeTag::Bool | TypeTag::Date => a.to_string() == b.to_string(),
        TypeTag::Str => text_equal_relaxed(&a.to_string(), &b.to_string()),
    }
}

/// Coerce both raw cells under `tag` and test equivalence.
pub fn equivalent(a: &str, b: &str, tag: TypeTag) -> bool {
    equivalent_values(&coerce(a, tag), &coerce(b, tag), tag)
}
