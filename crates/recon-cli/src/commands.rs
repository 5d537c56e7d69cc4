use anyhow::{Result, bail};

use recon_cli::pipeline::{self, PipelineConfig, PipelineResult, default_output_dir};
use recon_engine::EngineConfig;

use crate::cli::ReconcileArgs;

pub fn run_reconcile(args: &ReconcileArgs) -> Result<PipelineResult> {
    if args.month_start > args.month_end {
        bail!(
            "month range {}-{} is inverted; --month-start must not exceed --month-end",
            args.month_start,
            args.month_end
        );
    }
    let config = PipelineConfig {
        source_dir: args.source_dir.clone(),
        target_file: args.target.clone(),
        mapping_file: args.mapping.clone(),
        xref_file: args.cross_reference.clone(),
        value_maps_file: args.value_maps.clone(),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(&args.source_dir)),
        merge_column: args.merge_column.clone(),
        xref_source_column: args.xref_source_column.clone(),
        xref_target_column: args.xref_target_column.clone(),
        engine: EngineConfig {
            source_id_column: args.source_id_column.clone(),
            target_case_column: args.target_case_column.clone(),
            source_date_column: args.source_date_column.clone(),
            target_date_column: args.target_date_column.clone(),
            month_start: args.month_start,
            month_end: args.month_end,
        },
    };
    pipeline::run(&config)
}
