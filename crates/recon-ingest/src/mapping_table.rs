//! Declarative mapping-table loading.
//!
//! Header names carry the meaning, positions do not. Rules with a
//! blank field name on either side are dropped before use.

use std::path::Path;

use tracing::{info, warn};

use recon_model::{FileCategory, MappingRule, TypeTag};

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::{IngestError, Result};

const SOURCE_FIELD: &[&str] = &["source_field", "epic_field", "epic_varcolumnname"];
const SOURCE_CATEGORY: &[&str] = &[
    "source_file_category",
    "source_category",
    "epic_exportfilename",
    "epic_table",
];
const SOURCE_TYPE: &[&str] = &["source_type", "epic_vartype"];
const TARGET_FIELD: &[&str] = &["target_field", "st_varcolumnname", "secutrial_import_field"];
const TARGET_CATEGORY: &[&str] = &[
    "target_file_category",
    "target_category",
    "st_exportfilename",
    "secutrial_import_table",
];
const TARGET_TYPE: &[&str] = &["target_type", "st_vartype"];

fn find_column(table: &CsvTable, path: &Path, aliases: &[&str]) -> Result<usize> {
    for alias in aliases {
        if let Some(position) = table.column_position(alias) {
            return Ok(position);
        }
    }
    Err(IngestError::MissingHeader {
        path: path.to_path_buf(),
        name: aliases[0].to_string(),
    })
}

/// Load mapping rules from a CSV mapping table.
pub fn load_mapping_rules(path: &Path) -> Result<Vec<MappingRule>> {
    let table = read_csv_table(path)?;
    let source_field = find_column(&table, path, SOURCE_FIELD)?;
    let source_category = find_column(&table, path, SOURCE_CATEGORY)?;
    let source_type = find_column(&table, path, SOURCE_TYPE)?;
    let target_field = find_column(&table, path, TARGET_FIELD)?;
    let target_category = find_column(&table, path, TARGET_CATEGORY)?;
    let target_type = find_column(&table, path, TARGET_TYPE)?;

    let mut rules = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for row in 0..table.rows.len() {
        let rule = MappingRule {
            source_field: table.cell(row, source_field).trim().to_string(),
            source_category: FileCategory::from_label(table.cell(row, source_category)),
            source_type: TypeTag::parse(table.cell(row, source_type)),
            target_field: table.cell(row, target_field).trim().to_string(),
            target_category: table.cell(row, target_category).trim().to_string(),
            target_type: TypeTag::parse(table.cell(row, target_type)),
        };
        if rule.is_valid() {
            rules.push(rule);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        warn!(dropped, file = %path.display(), "dropped mapping rows with blank field names");
    }
    info!(rules = rules.len(), file = %path.display(), "loaded mapping table");
    Ok(rules)
}
