pub mod error;
pub mod identity;
pub mod mapping;
pub mod mismatch;
pub mod stats;
pub mod types;
pub mod value;

pub use error::{ReconError, Result, Side};
pub use identity::{CrossReference, IdentityPair};
pub use mapping::{ColumnMap, ColumnPair, MappingRule};
pub use mismatch::MismatchRecord;
pub use stats::{Classification, ComparisonStats, StatsSummary, month_name};
pub use types::{FileCategory, TypeTag};
pub use value::{CellValue, ValueKind};
