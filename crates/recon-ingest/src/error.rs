//! Error types for export loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading export files and reference tables.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("no data files found in {path}")]
    NoDataFiles { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse value maps {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: required column '{name}' not found in header")]
    MissingHeader { path: PathBuf, name: String },

    #[error("{path}: merge column '{name}' not found in any data file")]
    MissingMergeColumn { path: PathBuf, name: String },

    #[error("failed to build data frame: {message}")]
    Frame { message: String },
}

pub type Result<T> = std::result::Result<T, IngestError>;
