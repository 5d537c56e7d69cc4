//! Source-export merging.
//!
//! An EHR export arrives as one CSV per subsystem (encounters,
//! flowsheet, imaging, lab, medication, monitor) sharing a patient
//! key column. Files merge into one wide table, encounters first,
//! with every non-key column prefixed by its subsystem so names stay
//! unambiguous after the join.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use recon_model::FileCategory;

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::{IngestError, Result};
use crate::frame::table_to_frame;

struct MergedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    index: BTreeMap<String, usize>,
}

impl MergedTable {
    fn new(merge_column: &str) -> Self {
        Self {
            headers: vec![merge_column.to_string()],
            rows: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Outer-join one prefixed file into the accumulated table.
    fn absorb(&mut self, table: &CsvTable, key_position: usize, prefix: &str) {
        let mut incoming_positions = Vec::new();
        for (position, header) in table.headers.iter().enumerate() {
            if position == key_position {
                continue;
            }
            self.headers.push(format!("{prefix}{header}"));
            incoming_positions.push(position);
        }
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
        for (row_idx, row) in table.rows.iter().enumerate() {
            let key = row.get(key_position).map(String::as_str).unwrap_or("").trim();
            if key.is_empty() {
                debug!(row = row_idx, "skipping row without merge key");
                continue;
            }
            let slot = match self.index.get(key) {
                Some(&slot) => slot,
                None => {
                    let mut fresh = vec![String::new(); width];
                    fresh[0] = key.to_string();
                    self.rows.push(fresh);
                    self.index.insert(key.to_string(), self.rows.len() - 1);
                    self.rows.len() - 1
                }
            };
            let offset = width - incoming_positions.len();
            for (out_idx, &position) in incoming_positions.iter().enumerate() {
                let value = row.get(position).cloned().unwrap_or_default();
                let cell = &mut self.rows[slot][offset + out_idx];
                if cell.is_empty() {
                    *cell = value;
                }
            }
        }
    }

    fn into_table(self) -> CsvTable {
        CsvTable {
            headers: self.headers,
            rows: self.rows,
        }
    }
}

fn csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::FileRead {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::FileRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn merge_priority(path: &Path) -> usize {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    let category = FileCategory::from_file_stem(&stem);
    FileCategory::MERGE_ORDER
        .iter()
        .position(|&c| c == category)
        .unwrap_or(FileCategory::MERGE_ORDER.len())
}

/// Merge every CSV in a source export directory on `merge_column`.
///
/// Files are processed in subsystem order (unclassified files last),
/// non-key columns gain the subsystem prefix, and rows join with
/// outer semantics: a patient present in any file gets a row, with
/// empty cells where a file had nothing for them.
pub fn merge_source_export(dir: &Path, merge_column: &str) -> Result<DataFrame> {
    let mut files = csv_files(dir)?;
    if files.is_empty() {
        return Err(IngestError::NoDataFiles {
            path: dir.to_path_buf(),
        });
    }
    files.sort_by_key(|path| merge_priority(path));

    let mut merged = MergedTable::new(merge_column);
    let mut merged_any = false;
    for path in &files {
        let table = read_csv_table(path)?;
        let Some(key_position) = table.column_position(merge_column) else {
            warn!(
                file = %path.display(),
                column = merge_column,
                "merge column not found, skipping file"
            );
            continue;
        };
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default();
        let prefix = FileCategory::from_file_stem(&stem).prefix();
        info!(
            file = %path.display(),
            prefix,
            columns = table.headers.len(),
            rows = table.rows.len(),
            "merging source file"
        );
        merged.absorb(&table, key_position, prefix);
        merged_any = true;
    }
    if !merged_any {
        return Err(IngestError::MissingMergeColumn {
            path: dir.to_path_buf(),
            name: merge_column.to_string(),
        });
    }
    let table = merged.into_table();
    info!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "merged source export"
    );
    table_to_frame(&table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> CsvTable {
        CsvTable {
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn absorb_outer_joins_on_key() {
        let mut merged = MergedTable::new("CSN");
        merged.absorb(
            &table(&["CSN", "sex"], &[&["1", "M"], &["2", "F"]]),
            0,
            "enct.",
        );
        merged.absorb(
            &table(&["hypertension", "CSN"], &[&["yes", "2"], &["no", "3"]]),
            1,
            "flow.",
        );
        let out = merged.into_table();
        assert_eq!(out.headers, vec!["CSN", "enct.sex", "flow.hypertension"]);
        assert_eq!(out.rows.len(), 3);
        // Patient 2 has both files, 1 only encounters, 3 only flowsheet.
        assert_eq!(out.rows[1], vec!["2", "F", "yes"]);
        assert_eq!(out.rows[0], vec!["1", "M", ""]);
        assert_eq!(out.rows[2], vec!["3", "", "no"]);
    }

    #[test]
    fn absorb_keeps_first_value_for_duplicate_keys() {
        let mut merged = MergedTable::new("CSN");
        merged.absorb(
            &table(&["CSN", "sex"], &[&["1", "M"], &["1", "F"]]),
            0,
            "enct.",
        );
        let out = merged.into_table();
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0], vec!["1", "M"]);
    }
}
