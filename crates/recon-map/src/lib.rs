//! Column mapping resolution.
//!
//! Turns mapping-table rules into fully qualified column pairs:
//! source names gain their subsystem prefix, target names gain a
//! suffix only for the secondary-report category, and the tag each
//! comparison runs under is resolved once here rather than per value.

pub mod resolver;

pub use resolver::{build_column_map, target_suffix};
