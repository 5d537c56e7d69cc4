//! Markdown rendering of one reconciliation outcome.

use std::fmt::Write as _;

use recon_engine::ReconOutcome;
use recon_model::{StatsSummary, month_name};

/// What "problematic" means when ranking variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProblemSort {
    /// Share of outright disagreements.
    #[default]
    MismatchPercent,
    /// Share of values absent on the source side.
    MissingInSourcePercent,
    /// Share of values absent on the registry side.
    MissingInTargetPercent,
    /// Everything that is not a match, as an absolute count.
    TotalProblems,
}

impl ProblemSort {
    fn score(self, stats: &StatsSummary) -> f64 {
        match self {
            Self::MismatchPercent => stats.mismatch_percent,
            Self::MissingInSourcePercent => stats.missing_in_source_percent,
            Self::MissingInTargetPercent => stats.missing_in_target_percent,
            Self::TotalProblems => {
                (stats.mismatches + stats.missing_in_source + stats.missing_in_target) as f64
            }
        }
    }
}

/// Variables ranked by the chosen problem measure, score first, then
/// absolute mismatch count, then label so the ranking is stable.
/// Variables with a zero score are left out entirely.
pub fn top_problematic_variables(
    outcome: &ReconOutcome,
    sort: ProblemSort,
    limit: usize,
) -> Vec<(String, StatsSummary)> {
    let mut ranked: Vec<(String, StatsSummary)> = outcome
        .by_variable
        .iter()
        .filter(|(_, stats)| sort.score(stats) > 0.0)
        .map(|(label, stats)| (label.clone(), *stats))
        .collect();
    ranked.sort_by(|(label_a, a), (label_b, b)| {
        sort.score(b)
            .partial_cmp(&sort.score(a))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.mismatches.cmp(&a.mismatches))
            .then_with(|| label_a.cmp(label_b))
    });
    ranked.truncate(limit);
    ranked
}

fn stats_row(out: &mut String, label: &str, stats: &StatsSummary) {
    let _ = writeln!(
        out,
        "| {label} | {} | {} ({:.2}%) | {} ({:.2}%) | {} ({:.2}%) | {} ({:.2}%) |",
        stats.total_compared,
        stats.matches,
        stats.match_percent,
        stats.mismatches,
        stats.mismatch_percent,
        stats.missing_in_source,
        stats.missing_in_source_percent,
        stats.missing_in_target,
        stats.missing_in_target_percent,
    );
}

const STATS_HEADER: &str = "| | Compared | Match | Mismatch | Missing in source | Missing in target |\n|---|---|---|---|---|---|";

/// Render the full agreement report as Markdown.
pub fn render_markdown_report(outcome: &ReconOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Patient Record Reconciliation Report\n");

    let _ = writeln!(out, "## Patients\n");
    let _ = writeln!(
        out,
        "- Matched in both systems: {}",
        outcome.identity.common.len()
    );
    let _ = writeln!(
        out,
        "- Only in source export: {}",
        outcome.identity.only_in_source.len()
    );
    let _ = writeln!(
        out,
        "- Only in registry: {}",
        outcome.identity.only_in_target.len()
    );
    let _ = writeln!(
        out,
        "- Skipped (no month or out of reporting scope): {}\n",
        outcome.skipped_identities
    );

    let _ = writeln!(out, "## Overall agreement\n");
    let _ = writeln!(out, "{STATS_HEADER}");
    stats_row(&mut out, "All variables", &outcome.overall);
    let _ = writeln!(out);

    let _ = writeln!(out, "## By month\n");
    let _ = writeln!(out, "{STATS_HEADER}");
    for (month, stats) in &outcome.monthly {
        stats_row(&mut out, month_name(*month), stats);
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "## By variable\n");
    let _ = writeln!(out, "{STATS_HEADER}");
    for (label, stats) in &outcome.by_variable {
        stats_row(&mut out, label, stats);
    }
    let _ = writeln!(out);

    let problematic = top_problematic_variables(outcome, ProblemSort::MismatchPercent, 10);
    if !problematic.is_empty() {
        let _ = writeln!(out, "## Most problematic variables\n");
        for (rank, (label, stats)) in problematic.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {label}: {} mismatches ({:.2}%)",
                rank + 1,
                stats.mismatches,
                stats.mismatch_percent,
            );
        }
        let _ = writeln!(out);
    }

    out
}
