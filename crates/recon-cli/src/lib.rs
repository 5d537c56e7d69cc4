//! Library components of the reconciliation CLI: logging setup and
//! the end-to-end pipeline, kept callable from integration tests.

pub mod logging;
pub mod pipeline;
