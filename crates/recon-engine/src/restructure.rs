//! Wide-format mismatch table for site review.
//!
//! The reconciliation pass emits one row per mismatching cell; review
//! staff want one row per patient with a target/source value column
//! pair for every variable. Variables keep their mapping order, and
//! the target value deliberately precedes the source value in each
//! pair so reviewers read the registry entry first.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame};
use tracing::warn;

use recon_model::{IdentityPair, MismatchRecord, ReconError, Result};

/// Pivot mismatch detail rows into one row per identity.
///
/// `variable_order` lists the source column names in mapping order;
/// variables with no mismatch anywhere still get their column pair.
/// When the same identity and variable appear twice, the first record
/// wins and the rest are dropped with a warning.
pub fn restructure_mismatches(
    records: &[MismatchRecord],
    variable_order: &[String],
) -> Result<DataFrame> {
    let mut cells: BTreeMap<IdentityPair, BTreeMap<&str, &MismatchRecord>> = BTreeMap::new();
    let mut duplicates = 0u64;
    for record in records {
        let row = cells.entry(record.identity).or_default();
        if row.contains_key(record.source_column.as_str()) {
            duplicates += 1;
            continue;
        }
        row.insert(record.source_column.as_str(), record);
    }
    if duplicates > 0 {
        warn!(duplicates, "dropped duplicate mismatch records");
    }

    let identities: Vec<IdentityPair> = cells.keys().copied().collect();
    let mut columns = vec![
        Column::new(
            "source_id".into(),
            identities
                .iter()
                .map(|pair| pair.source_id.to_string())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "target_id".into(),
            identities
                .iter()
                .map(|pair| pair.target_id.to_string())
                .collect::<Vec<_>>(),
        ),
    ];
    for variable in variable_order {
        let mut target_values = Vec::with_capacity(identities.len());
        let mut source_values = Vec::with_capacity(identities.len());
        for pair in &identities {
            match cells[pair].get(variable.as_str()) {
                Some(record) => {
                    target_values.push(record.target_value.clone());
                    source_values.push(record.source_value.clone());
                }
                None => {
                    target_values.push(String::new());
                    source_values.push(String::new());
                }
            }
        }
        columns.push(Column::new(format!("{variable}_target").into(), target_values));
        columns.push(Column::new(format!("{variable}_source").into(), source_values));
    }
    DataFrame::new(columns)
        .map_err(|error| ReconError::Message(format!("mismatch table error: {error}")))
}
