//! End-to-end reconciliation pipeline.
//!
//! Orchestrates ingest, comparison, and output writing. Lives in the
//! library so integration tests can drive a whole run against
//! temporary directories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use recon_engine::{
    EngineConfig, ReconOutcome, partition_frame, reconcile, restructure_mismatches,
};
use recon_ingest::{
    ValueMaps, default_value_maps, load_cross_reference, load_mapping_rules, load_value_maps,
    merge_source_export, read_csv_table, table_to_frame,
};
use recon_map::build_column_map;
use recon_model::{ColumnMap, CrossReference};
use recon_report::{write_frame_csv, write_markdown_report, write_summary_json};

/// Everything one pipeline run needs to know.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the categorized source export CSV files.
    pub source_dir: PathBuf,
    /// Registry export CSV.
    pub target_file: PathBuf,
    /// Declarative mapping table CSV.
    pub mapping_file: PathBuf,
    /// Identity cross-reference CSV.
    pub xref_file: PathBuf,
    /// Optional value-map dictionaries (JSON). Built-in defaults
    /// apply when absent.
    pub value_maps_file: Option<PathBuf>,
    /// Directory the outputs land in; created when missing.
    pub output_dir: PathBuf,
    /// Column the source files are merged on.
    pub merge_column: String,
    /// Cross-reference column holding the source identifier.
    pub xref_source_column: String,
    /// Cross-reference column holding the target identifier.
    pub xref_target_column: String,
    /// Column designations and reporting scope.
    pub engine: EngineConfig,
}

/// Output paths plus the reconciliation outcome of one run.
#[derive(Debug)]
pub struct PipelineResult {
    pub outcome: ReconOutcome,
    pub output_dir: PathBuf,
    pub report_path: PathBuf,
    pub summary_path: PathBuf,
    pub mismatch_path: PathBuf,
    pub only_in_source_path: PathBuf,
    pub only_in_target_path: PathBuf,
}

struct Inputs {
    source: DataFrame,
    target: DataFrame,
    column_map: ColumnMap,
    xref: CrossReference,
    value_maps: ValueMaps,
}

fn ingest(config: &PipelineConfig) -> Result<Inputs> {
    let span = info_span!("ingest");
    let _guard = span.enter();

    let source = merge_source_export(&config.source_dir, &config.merge_column)
        .context("merging source export")?;
    let target_table = read_csv_table(&config.target_file)
        .with_context(|| format!("reading {}", config.target_file.display()))?;
    let target = table_to_frame(&target_table).context("building registry frame")?;

    let rules = load_mapping_rules(&config.mapping_file)
        .with_context(|| format!("loading {}", config.mapping_file.display()))?;
    let column_map = build_column_map(&rules);

    let xref = load_cross_reference(
        &config.xref_file,
        &config.xref_source_column,
        &config.xref_target_column,
    )
    .with_context(|| format!("loading {}", config.xref_file.display()))?;

    let value_maps = match &config.value_maps_file {
        Some(path) => {
            load_value_maps(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => default_value_maps(),
    };

    info!(
        source_rows = source.height(),
        target_rows = target.height(),
        variables = column_map.len(),
        cross_references = xref.len(),
        "inputs loaded"
    );
    Ok(Inputs {
        source,
        target,
        column_map,
        xref,
        value_maps,
    })
}

fn write_outputs(
    config: &PipelineConfig,
    inputs: &Inputs,
    outcome: &ReconOutcome,
) -> Result<PipelineResult> {
    let span = info_span!("output");
    let _guard = span.enter();

    let output_dir = &config.output_dir;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let report_path = output_dir.join("report.md");
    write_markdown_report(outcome, &report_path)?;
    let summary_path = output_dir.join("summary.json");
    write_summary_json(outcome, &summary_path)?;

    let mismatch_path = output_dir.join("mismatches.csv");
    let mismatch_table =
        restructure_mismatches(&outcome.mismatches, &inputs.column_map.source_columns())
            .context("restructuring mismatches")?;
    write_frame_csv(&mismatch_table, &mismatch_path)?;

    let only_in_source_path = output_dir.join("only_in_source.csv");
    let only_in_source = partition_frame(
        &inputs.source,
        &outcome.identity.source_rows,
        &outcome.identity.only_in_source,
    )
    .context("extracting source-only patients")?;
    write_frame_csv(&only_in_source, &only_in_source_path)?;

    let only_in_target_path = output_dir.join("only_in_target.csv");
    let only_in_target = partition_frame(
        &inputs.target,
        &outcome.identity.target_rows,
        &outcome.identity.only_in_target,
    )
    .context("extracting registry-only patients")?;
    write_frame_csv(&only_in_target, &only_in_target_path)?;

    info!(output_dir = %output_dir.display(), "outputs written");
    Ok(PipelineResult {
        outcome: outcome.clone(),
        output_dir: output_dir.clone(),
        report_path,
        summary_path,
        mismatch_path,
        only_in_source_path,
        only_in_target_path,
    })
}

/// Run the whole pipeline: ingest, reconcile, write outputs.
pub fn run(config: &PipelineConfig) -> Result<PipelineResult> {
    let inputs = ingest(config)?;

    let outcome = {
        let span = info_span!("reconcile");
        let _guard = span.enter();
        reconcile(
            &inputs.source,
            &inputs.target,
            &inputs.column_map,
            &inputs.xref,
            &inputs.value_maps,
            &config.engine,
        )?
    };

    write_outputs(config, &inputs, &outcome)
}

/// Default output directory when none was given.
pub fn default_output_dir(source_dir: &Path) -> PathBuf {
    source_dir.join("reconciliation")
}
