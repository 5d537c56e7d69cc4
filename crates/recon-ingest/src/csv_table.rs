//! Rectangular CSV tables with tolerant header handling.
//!
//! Registry exports often carry preamble rows (report title, export
//! metadata) above the real header. `read_csv_table` scans the first
//! few rows for the most header-like one and treats everything below
//! it as data. Cells stay untyped strings; coercion happens later.

use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// A rectangular table of named string columns.
#[derive(Debug, Clone)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Position of a header, matched case-insensitively.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name.trim()))
    }

    /// Cell value at (row, header position), empty when absent.
    pub fn cell(&self, row: usize, position: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(position))
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn header_score(row: &[String]) -> f64 {
    let total = row.len().max(1) as f64;
    let mut non_empty = 0usize;
    let mut alpha = 0usize;
    let mut numeric = 0usize;
    for cell in row {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            continue;
        }
        non_empty += 1;
        if trimmed.chars().any(|ch| ch.is_ascii_alphabetic()) {
            alpha += 1;
        }
        if trimmed.parse::<f64>().is_ok() {
            numeric += 1;
        }
    }
    // Header rows are dense, textual, and carry no numbers.
    non_empty as f64 / total + alpha as f64 / total - 2.0 * numeric as f64 / total
}

fn detect_header_row(rows: &[Vec<String>]) -> usize {
    let probe = rows.len().min(8);
    let mut best = 0usize;
    let mut best_score = f64::MIN;
    for (idx, row) in rows.iter().take(probe).enumerate() {
        let score = header_score(row);
        if score > best_score {
            best = idx;
            best_score = score;
        }
    }
    best
}

/// Read a CSV file into a table, skipping blank rows and any preamble
/// above the detected header row.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(|value| value.is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }
    if raw_rows.is_empty() {
        return Ok(CsvTable {
            headers: Vec::new(),
            rows: Vec::new(),
        });
    }
    let header_index = detect_header_row(&raw_rows);
    let headers: Vec<String> = raw_rows[header_index]
        .iter()
        .map(|value| normalize_header(value))
        .collect();
    let mut rows = Vec::new();
    for record in raw_rows.iter().skip(header_index + 1) {
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).map(String::as_str).unwrap_or("");
            row.push(value.to_string());
        }
        rows.push(row);
    }
    Ok(CsvTable { headers, rows })
}
