//! Identity cross-reference loading.
//!
//! The identity log pairs a numeric source-system identifier with a
//! numeric target-system identifier. Rows with a missing or
//! non-numeric identifier on either side are discarded; duplicate
//! pairs resolve first-wins so repeated runs stay deterministic.

use std::path::Path;

use tracing::{info, warn};

use recon_model::CrossReference;

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::{IngestError, Result};
use crate::frame::parse_i64;

fn find_column(table: &CsvTable, path: &Path, name: &str) -> Result<usize> {
    if let Some(position) = table.column_position(name) {
        return Ok(position);
    }
    // Registry exports decorate header names ("Fall-Nr.", "SSR
    // Identification SSR-INS-000..."), so fall back to substring match.
    let needle = name.trim().to_ascii_lowercase();
    table
        .headers
        .iter()
        .position(|header| header.to_ascii_lowercase().contains(&needle))
        .ok_or_else(|| IngestError::MissingHeader {
            path: path.to_path_buf(),
            name: name.to_string(),
        })
}

/// Load the identity cross-reference from a two-column CSV.
pub fn load_cross_reference(
    path: &Path,
    source_column: &str,
    target_column: &str,
) -> Result<CrossReference> {
    let table = read_csv_table(path)?;
    let source_position = find_column(&table, path, source_column)?;
    let target_position = find_column(&table, path, target_column)?;

    let mut xref = CrossReference::new();
    let mut discarded = 0usize;
    let mut duplicates = 0usize;
    for row in 0..table.rows.len() {
        let source_id = parse_i64(table.cell(row, source_position));
        let target_id = parse_i64(table.cell(row, target_position));
        match (source_id, target_id) {
            (Some(source_id), Some(target_id)) => {
                if !xref.insert(source_id, target_id) {
                    duplicates += 1;
                }
            }
            _ => discarded += 1,
        }
    }
    if discarded > 0 {
        warn!(discarded, file = %path.display(), "discarded cross-reference rows with unusable identifiers");
    }
    if duplicates > 0 {
        warn!(duplicates, file = %path.display(), "ignored duplicate cross-reference rows (first occurrence kept)");
    }
    info!(entries = xref.len(), file = %path.display(), "loaded identity cross-reference");
    Ok(xref)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("id_log.csv");
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    #[test]
    fn loads_and_cleans_reference() {
        let dir = tempfile::tempdir().expect("tempdir");
        let contents = "Fall-Nr.,SSR Identification\n1,101\n2,102\nx,103\n4,\n1,999\n";
        let path = write_fixture(&dir, contents);
        let xref = load_cross_reference(&path, "Fall-Nr.", "SSR Identification").expect("load");
        assert_eq!(xref.len(), 2);
        assert_eq!(xref.target_for(1), Some(101));
        assert_eq!(xref.target_for(2), Some(102));
        assert_eq!(xref.target_for(4), None);
    }

    #[test]
    fn decorated_headers_resolve_by_substring() {
        let dir = tempfile::tempdir().expect("tempdir");
        let contents = "Fall-Nr. (Hospital),SSR Identification SSR-INS-000\n7,707\n";
        let path = write_fixture(&dir, contents);
        let xref = load_cross_reference(&path, "Fall-Nr.", "SSR Identification").expect("load");
        assert_eq!(xref.target_for(7), Some(707));
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_fixture(&dir, "A,B\n1,2\n");
        let error = load_cross_reference(&path, "Fall-Nr.", "SSR").expect_err("should fail");
        assert!(error.to_string().contains("Fall-Nr."));
    }
}
