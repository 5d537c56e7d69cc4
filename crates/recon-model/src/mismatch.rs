//! Mismatch detail rows emitted by the reconciliation pass.

use serde::Serialize;

use crate::identity::IdentityPair;
use crate::types::TypeTag;
use crate::value::ValueKind;

/// One discrepancy between the two systems: which patient, which
/// variable, which month bucket, the raw values on both sides, and
/// both the declared and realized types. Collection order follows the
/// comparison loop and carries no meaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MismatchRecord {
    pub identity: IdentityPair,
    /// 1-based calendar month the record was bucketed into.
    pub month: u32,
    pub source_column: String,
    pub target_column: String,
    pub source_value: String,
    pub target_value: String,
    pub source_declared: TypeTag,
    pub target_declared: TypeTag,
    pub source_realized: ValueKind,
    pub target_realized: ValueKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_readable_types() {
        let record = MismatchRecord {
            identity: IdentityPair::new(1, 101),
            month: 4,
            source_column: "flow.hypertension".to_string(),
            target_column: "Hypertension".to_string(),
            source_value: "1".to_string(),
            target_value: "no".to_string(),
            source_declared: TypeTag::Bool,
            target_declared: TypeTag::Bool,
            source_realized: ValueKind::Text,
            target_realized: ValueKind::Text,
        };
        let json = serde_json::to_string(&record).expect("serialize record");
        assert!(json.contains("\"source_declared\":\"bool\""));
        assert!(json.contains("\"source_realized\":\"str\""));
        assert!(json.contains("\"source_id\":1"));
    }
}
