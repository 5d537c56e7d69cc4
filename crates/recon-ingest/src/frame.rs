//! DataFrame construction and cell access helpers.
//!
//! Frames built here hold string columns only; the engine coerces
//! cells on demand. `AnyValue` conversion is tolerant so a frame built
//! elsewhere with typed columns still reads cleanly.

use std::collections::BTreeMap;

use polars::prelude::{AnyValue, Column, DataFrame};

use crate::csv_table::CsvTable;
use crate::error::{IngestError, Result};

/// Build an all-string DataFrame from a CSV table. Duplicate headers
/// are disambiguated with a numeric suffix so frame construction
/// cannot collide.
pub fn table_to_frame(table: &CsvTable) -> Result<DataFrame> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut columns = Vec::with_capacity(table.headers.len());
    for (idx, header) in table.headers.iter().enumerate() {
        let count = seen.entry(header.clone()).or_insert(0);
        *count += 1;
        let name = if *count == 1 {
            header.clone()
        } else {
            format!("{header}_{count}")
        };
        let values: Vec<String> = table
            .rows
            .iter()
            .map(|row| row.get(idx).cloned().unwrap_or_default())
            .collect();
        columns.push(Column::new(name.into(), values));
    }
    DataFrame::new(columns).map_err(|error| IngestError::Frame {
        message: error.to_string(),
    })
}

/// Converts a Polars AnyValue to its string representation. Null
/// becomes the empty string.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "true" } else { "false" }.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// String value of one cell; empty when the column is absent.
pub fn column_value_string(df: &DataFrame, name: &str, idx: usize) -> String {
    match df.column(name) {
        Ok(column) => any_to_string(column.get(idx).unwrap_or(AnyValue::Null)),
        Err(_) => String::new(),
    }
}

/// All values of a column as strings, or `None` when the column is
/// absent.
pub fn frame_column_strings(df: &DataFrame, name: &str) -> Option<Vec<String>> {
    let column = df.column(name).ok()?;
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        values.push(any_to_string(column.get(idx).unwrap_or(AnyValue::Null)));
    }
    Some(values)
}

/// Parses a string as f64, returning None for invalid or empty input.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a string as i64, falling back to float truncation so
/// identifiers exported as `101.0` still resolve.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    trimmed.parse::<f64>().ok().map(|v| v.trunc() as i64)
}
