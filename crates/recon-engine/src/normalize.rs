//! Source-side value normalization.
//!
//! Replaces enumerated codes with their labels before coercion.
//! Codes absent from a dictionary pass through unchanged; this is a
//! deliberate permissive policy, not a validation step, and is not
//! logged.

use polars::prelude::{Column, DataFrame};

use recon_ingest::{ValueMaps, frame_column_strings};
use recon_model::{ReconError, Result};

/// Apply value-mapping dictionaries to the columns they name. Columns
/// without a dictionary, and dictionary columns absent from the
/// frame, are left untouched.
pub fn apply_value_maps(df: &DataFrame, maps: &ValueMaps) -> Result<DataFrame> {
    if maps.is_empty() {
        return Ok(df.clone());
    }
    let mut columns = Vec::with_capacity(df.width());
    for name in df.get_column_names() {
        let name = name.to_string();
        let Some(dictionary) = maps.get(&name) else {
            columns.push(df.column(&name).map_err(frame_error)?.clone());
            continue;
        };
        let values = frame_column_strings(df, &name).unwrap_or_default();
        let mapped: Vec<String> = values
            .into_iter()
            .map(|value| {
                let key = value.trim();
                dictionary.get(key).cloned().unwrap_or(value)
            })
            .collect();
        columns.push(Column::new(name.into(), mapped));
    }
    DataFrame::new(columns).map_err(frame_error)
}

fn frame_error(error: polars::prelude::PolarsError) -> ReconError {
    ReconError::Message(format!("frame error during normalization: {error}"))
}
