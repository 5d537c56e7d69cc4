//! Reconciliation engine: value coercion, source normalization,
//! identity matching, the comparison pass, and mismatch restructuring.

pub mod coerce;
pub mod compare;
pub mod config;
pub mod identity;
pub mod normalize;
pub mod restructure;

pub use coerce::{coerce, equivalent, equivalent_values, format_display, is_missing_value};
pub use compare::{ReconOutcome, reconcile};
pub use config::EngineConfig;
pub use identity::{IdentityMatch, match_identities, partition_frame, trailing_number};
pub use normalize::apply_value_maps;
pub use restructure::restructure_mismatches;
