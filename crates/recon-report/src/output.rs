//! File outputs: CSV tables, the JSON summary, the Markdown report.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::info;

use recon_engine::ReconOutcome;
use recon_ingest::column_value_string;
use recon_model::{StatsSummary, month_name};

use crate::markdown::render_markdown_report;

/// Write an all-string frame as a plain CSV file.
pub fn write_frame_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    writer
        .write_record(&names)
        .with_context(|| format!("writing header to {}", path.display()))?;
    for idx in 0..df.height() {
        let row: Vec<String> = names
            .iter()
            .map(|name| column_value_string(df, name, idx))
            .collect();
        writer
            .write_record(&row)
            .with_context(|| format!("writing row {idx} to {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

#[derive(Serialize)]
struct MonthlyEntry<'a> {
    month: &'static str,
    #[serde(flatten)]
    stats: &'a StatsSummary,
}

#[derive(Serialize)]
struct PatientCounts {
    matched: usize,
    only_in_source: usize,
    only_in_target: usize,
    skipped: u64,
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    patients: PatientCounts,
    overall: &'a StatsSummary,
    monthly: Vec<MonthlyEntry<'a>>,
    variables: &'a std::collections::BTreeMap<String, StatsSummary>,
}

/// Serialize the statistics of one run as pretty-printed JSON.
pub fn write_summary_json(outcome: &ReconOutcome, path: &Path) -> Result<()> {
    let document = SummaryDocument {
        patients: PatientCounts {
            matched: outcome.identity.common.len(),
            only_in_source: outcome.identity.only_in_source.len(),
            only_in_target: outcome.identity.only_in_target.len(),
            skipped: outcome.skipped_identities,
        },
        overall: &outcome.overall,
        monthly: outcome
            .monthly
            .iter()
            .map(|(month, stats)| MonthlyEntry {
                month: month_name(*month),
                stats,
            })
            .collect(),
        variables: &outcome.by_variable,
    };
    let json = serde_json::to_string_pretty(&document).context("serializing summary")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Write the Markdown report for one run.
pub fn write_markdown_report(outcome: &ReconOutcome, path: &Path) -> Result<()> {
    fs::write(path, render_markdown_report(outcome))
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "wrote reconciliation report");
    Ok(())
}
