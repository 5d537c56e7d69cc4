//! Patient identity matching across the two exports.
//!
//! Each source row carries the source identifier directly; each
//! target row encodes the target identifier as the trailing digits of
//! its case number. The cross-reference backfills the counterpart
//! identifier on each side, and rows then partition into present in
//! both, only in source, and only in target. Rows without a usable
//! identity on either side are excluded from every partition.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::{Column, DataFrame};
use tracing::{debug, info};

use recon_ingest::{column_value_string, frame_column_strings, parse_i64};
use recon_model::{CrossReference, IdentityPair, ReconError, Result, Side};

use crate::config::EngineConfig;

/// Result of identity matching: the canonical key space plus the row
/// index each pair resolves to on each side.
#[derive(Debug, Clone, Default)]
pub struct IdentityMatch {
    /// First source row per identity pair.
    pub source_rows: BTreeMap<IdentityPair, usize>,
    /// First target row per identity pair.
    pub target_rows: BTreeMap<IdentityPair, usize>,
    /// Pairs present on both sides, sorted.
    pub common: Vec<IdentityPair>,
    /// Pairs with a source row but no target row.
    pub only_in_source: Vec<IdentityPair>,
    /// Pairs with a target row but no source row.
    pub only_in_target: Vec<IdentityPair>,
}

/// Trailing digits of a case number (`"SSR-INS-101"` -> 101).
pub fn trailing_number(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    let digits: Vec<char> = trimmed
        .chars()
        .rev()
        .take_while(|ch| ch.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.iter().rev().collect::<String>().parse().ok()
}

fn source_pairs(
    df: &DataFrame,
    xref: &CrossReference,
    config: &EngineConfig,
) -> Result<BTreeMap<IdentityPair, usize>> {
    let values = frame_column_strings(df, &config.source_id_column).ok_or_else(|| {
        ReconError::MissingIdentityColumn {
            side: Side::Source,
            column: config.source_id_column.clone(),
        }
    })?;
    let mut rows = BTreeMap::new();
    for (idx, value) in values.iter().enumerate() {
        let Some(source_id) = parse_i64(value) else {
            continue;
        };
        let Some(target_id) = xref.target_for(source_id) else {
            debug!(source_id, "source row without cross-reference entry");
            continue;
        };
        rows.entry(IdentityPair::new(source_id, target_id))
            .or_insert(idx);
    }
    Ok(rows)
}

fn target_pairs(
    df: &DataFrame,
    xref: &CrossReference,
    config: &EngineConfig,
) -> Result<BTreeMap<IdentityPair, usize>> {
    let values = frame_column_strings(df, &config.target_case_column).ok_or_else(|| {
        ReconError::MissingIdentityColumn {
            side: Side::Target,
            column: config.target_case_column.clone(),
        }
    })?;
    let mut rows = BTreeMap::new();
    for (idx, value) in values.iter().enumerate() {
        let Some(target_id) = trailing_number(value) else {
            continue;
        };
        let Some(source_id) = xref.source_for(target_id) else {
            debug!(target_id, "target row without cross-reference entry");
            continue;
        };
        rows.entry(IdentityPair::new(source_id, target_id))
            .or_insert(idx);
    }
    Ok(rows)
}

/// Establish the canonical identity key space across both datasets.
pub fn match_identities(
    source: &DataFrame,
    target: &DataFrame,
    xref: &CrossReference,
    config: &EngineConfig,
) -> Result<IdentityMatch> {
    let source_rows = source_pairs(source, xref, config)?;
    let target_rows = target_pairs(target, xref, config)?;

    let source_keys: BTreeSet<IdentityPair> = source_rows.keys().copied().collect();
    let target_keys: BTreeSet<IdentityPair> = target_rows.keys().copied().collect();

    let common: Vec<IdentityPair> = source_keys.intersection(&target_keys).copied().collect();
    let only_in_source: Vec<IdentityPair> = source_keys.difference(&target_keys).copied().collect();
    let only_in_target: Vec<IdentityPair> = target_keys.difference(&source_keys).copied().collect();

    info!(
        common = common.len(),
        only_in_source = only_in_source.len(),
        only_in_target = only_in_target.len(),
        "matched patient identities"
    );

    Ok(IdentityMatch {
        source_rows,
        target_rows,
        common,
        only_in_source,
        only_in_target,
    })
}

/// Extract the rows for the given pairs into a frame led by the two
/// identity columns. Used to report one-sided patients.
pub fn partition_frame(
    df: &DataFrame,
    rows: &BTreeMap<IdentityPair, usize>,
    pairs: &[IdentityPair],
) -> Result<DataFrame> {
    let mut source_ids = Vec::with_capacity(pairs.len());
    let mut target_ids = Vec::with_capacity(pairs.len());
    let mut indices = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let Some(&idx) = rows.get(pair) else {
            continue;
        };
        source_ids.push(pair.source_id.to_string());
        target_ids.push(pair.target_id.to_string());
        indices.push(idx);
    }

    let mut columns = vec![
        Column::new("source_id".into(), source_ids),
        Column::new("target_id".into(), target_ids),
    ];
    for name in df.get_column_names() {
        let name = name.to_string();
        let values: Vec<String> = indices
            .iter()
            .map(|&idx| column_value_string(df, &name, idx))
            .collect();
        columns.push(Column::new(name.into(), values));
    }
    DataFrame::new(columns)
        .map_err(|error| ReconError::Message(format!("partition frame error: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_digits() {
        assert_eq!(trailing_number("SSR-INS-101"), Some(101));
        assert_eq!(trailing_number(" SSR-INS-0042 "), Some(42));
        assert_eq!(trailing_number("101"), Some(101));
        assert_eq!(trailing_number("SSR-INS-"), None);
        assert_eq!(trailing_number(""), None);
    }
}
