//! Report writers for reconciliation outcomes: Markdown agreement
//! report, JSON summary, and CSV exports of the mismatch and
//! partition tables.

mod markdown;
mod output;

pub use markdown::{ProblemSort, render_markdown_report, top_problematic_variables};
pub use output::{write_frame_csv, write_markdown_report, write_summary_json};
