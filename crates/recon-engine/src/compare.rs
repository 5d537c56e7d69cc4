//! The reconciliation pass.
//!
//! One synchronous sweep over column pairs and matched identities.
//! Each comparison increments counters at three levels at once
//! (overall, month bucket, variable) and mismatches are collected as
//! detail rows. The pass is a pure function of its inputs; running it
//! twice on the same data yields identical statistics.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::{debug, info};

use recon_ingest::{ValueMaps, column_value_string};
use recon_model::{
    Classification, ColumnMap, ColumnPair, ComparisonStats, CrossReference, IdentityPair,
    MismatchRecord, ReconError, Result, Side, StatsSummary,
};

use crate::coerce::{coerce, equivalent_values, parse_datetime};
use crate::config::EngineConfig;
use crate::identity::{IdentityMatch, match_identities};
use crate::normalize::apply_value_maps;

/// Everything one reconciliation run produces.
#[derive(Debug, Clone)]
pub struct ReconOutcome {
    pub mismatches: Vec<MismatchRecord>,
    pub overall: StatsSummary,
    /// Keyed by 1-based calendar month.
    pub monthly: BTreeMap<u32, StatsSummary>,
    /// Keyed by column-pair label (`source -> target`).
    pub by_variable: BTreeMap<String, StatsSummary>,
    pub identity: IdentityMatch,
    /// Matched identities whose month bucket fell outside reporting
    /// scope (or had no determinable bucket) and were skipped.
    pub skipped_identities: u64,
}

fn require_column(df: &DataFrame, column: &str, side: Side) -> Result<()> {
    let found = df
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == column);
    if found {
        Ok(())
    } else {
        Err(ReconError::MissingDateColumn {
            side,
            column: column.to_string(),
        })
    }
}

/// Month bucket for one matched identity: the designated source date
/// when it parses, the target date otherwise.
fn month_bucket(
    source: &DataFrame,
    target: &DataFrame,
    identity: &IdentityMatch,
    pair: IdentityPair,
    config: &EngineConfig,
) -> Option<u32> {
    use chrono::Datelike;
    let source_value = identity
        .source_rows
        .get(&pair)
        .map(|&idx| column_value_string(source, &config.source_date_column, idx))
        .unwrap_or_default();
    if let Some(parsed) = parse_datetime(&source_value) {
        return Some(parsed.date().month());
    }
    let target_value = identity
        .target_rows
        .get(&pair)
        .map(|&idx| column_value_string(target, &config.target_date_column, idx))
        .unwrap_or_default();
    parse_datetime(&target_value).map(|parsed| parsed.date().month())
}

fn classify(
    source_raw: &str,
    target_raw: &str,
    pair: &ColumnPair,
) -> (Classification, recon_model::CellValue, recon_model::CellValue) {
    let source_value = coerce(source_raw, pair.comparison_type);
    let target_value = coerce(target_raw, pair.comparison_type);
    let outcome = match (source_value.is_missing(), target_value.is_missing()) {
        // Absence on both sides is agreement.
        (true, true) => Classification::Match,
        (true, false) => Classification::MissingInSource,
        (false, true) => Classification::MissingInTarget,
        (false, false) => {
            if equivalent_values(&source_value, &target_value, pair.comparison_type) {
                Classification::Match
            } else {
                Classification::Mismatch
            }
        }
    };
    (outcome, source_value, target_value)
}

/// Run the full reconciliation: normalize, match identities, compare
/// every mapped column pair for every matched identity, and aggregate.
///
/// Fails fast when a designated identity or date column is absent;
/// every per-cell problem degrades to a missing value instead.
pub fn reconcile(
    source: &DataFrame,
    target: &DataFrame,
    column_map: &ColumnMap,
    xref: &CrossReference,
    value_maps: &ValueMaps,
    config: &EngineConfig,
) -> Result<ReconOutcome> {
    require_column(source, &config.source_date_column, Side::Source)?;
    require_column(target, &config.target_date_column, Side::Target)?;

    let source = apply_value_maps(source, value_maps)?;
    let identity = match_identities(&source, target, xref, config)?;

    let mut overall = ComparisonStats::default();
    let mut monthly: BTreeMap<u32, ComparisonStats> = BTreeMap::new();
    let mut by_variable: BTreeMap<String, ComparisonStats> = BTreeMap::new();
    let mut mismatches = Vec::new();
    let mut skipped = 0u64;

    for &pair in &identity.common {
        let Some(month) = month_bucket(&source, target, &identity, pair, config) else {
            debug!(
                source_id = pair.source_id,
                target_id = pair.target_id,
                "no month bucket, identity skipped"
            );
            skipped += 1;
            continue;
        };
        if !config.month_in_range(month) {
            skipped += 1;
            continue;
        }
        let source_row = identity.source_rows[&pair];
        let target_row = identity.target_rows[&pair];

        for column_pair in column_map {
            let source_raw = column_value_string(&source, &column_pair.source_column, source_row);
            let target_raw = column_value_string(target, &column_pair.target_column, target_row);
            let (outcome, source_value, target_value) =
                classify(&source_raw, &target_raw, column_pair);

            overall.record(outcome);
            monthly.entry(month).or_default().record(outcome);
            by_variable
                .entry(column_pair.label())
                .or_default()
                .record(outcome);

            if outcome == Classification::Mismatch {
                mismatches.push(MismatchRecord {
                    identity: pair,
                    month,
                    source_column: column_pair.source_column.clone(),
                    target_column: column_pair.target_column.clone(),
                    source_value: source_raw,
                    target_value: target_raw,
                    source_declared: column_pair.source_type,
                    target_declared: column_pair.target_type,
                    source_realized: source_value.kind(),
                    target_realized: target_value.kind(),
                });
            }
        }
    }

    info!(
        identities = identity.common.len(),
        variables = column_map.len(),
        compared = overall.total_compared(),
        mismatches = mismatches.len(),
        skipped,
        "reconciliation pass complete"
    );

    Ok(ReconOutcome {
        mismatches,
        overall: overall.summary(),
        monthly: monthly
            .into_iter()
            .map(|(month, stats)| (month, stats.summary()))
            .collect(),
        by_variable: by_variable
            .into_iter()
            .map(|(label, stats)| (label, stats.summary()))
            .collect(),
        identity,
        skipped_identities: skipped,
    })
}
