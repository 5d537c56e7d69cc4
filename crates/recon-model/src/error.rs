use std::fmt;

use thiserror::Error;

/// Which dataset a structural problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// Errors surfaced by the reconciliation pipeline.
///
/// Structural errors abort the run; everything else degrades locally
/// (a failed cell conversion becomes a missing value, duplicate
/// restructuring keys are dropped with a warning).
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("{side} dataset is missing mandatory identity column '{column}'")]
    MissingIdentityColumn { side: Side, column: String },

    #[error("{side} dataset is missing mandatory date column '{column}'")]
    MissingDateColumn { side: Side, column: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ReconError>;
