//! Patient identity keys and the identity cross-reference table.

use std::collections::BTreeMap;

use serde::Serialize;

/// The `(source id, target id)` key linking one patient's record
/// across both systems. Identity assignment is functional: a dataset
/// row has at most one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct IdentityPair {
    pub source_id: i64,
    pub target_id: i64,
}

impl IdentityPair {
    pub fn new(source_id: i64, target_id: i64) -> Self {
        Self {
            source_id,
            target_id,
        }
    }
}

/// Bidirectional source-id / target-id lookup loaded from the
/// identity log. Rows with a non-numeric identifier on either side
/// are discarded before this structure is built; duplicate pairs are
/// resolved first-wins so repeated runs stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct CrossReference {
    by_source: BTreeMap<i64, i64>,
    by_target: BTreeMap<i64, i64>,
}

impl CrossReference {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one pair. Returns `false` when either identifier was
    /// already claimed by an earlier row (the new row is ignored).
    pub fn insert(&mut self, source_id: i64, target_id: i64) -> bool {
        if self.by_source.contains_key(&source_id) || self.by_target.contains_key(&target_id) {
            return false;
        }
        self.by_source.insert(source_id, target_id);
        self.by_target.insert(target_id, source_id);
        true
    }

    pub fn target_for(&self, source_id: i64) -> Option<i64> {
        self.by_source.get(&source_id).copied()
    }

    pub fn source_for(&self, target_id: i64) -> Option<i64> {
        self.by_target.get(&target_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_order_by_source_then_target() {
        let mut pairs = vec![
            IdentityPair::new(2, 102),
            IdentityPair::new(1, 103),
            IdentityPair::new(1, 101),
        ];
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                IdentityPair::new(1, 101),
                IdentityPair::new(1, 103),
                IdentityPair::new(2, 102),
            ]
        );
    }

    #[test]
    fn first_insert_wins() {
        let mut xref = CrossReference::new();
        assert!(xref.insert(1, 101));
        assert!(!xref.insert(1, 999));
        assert!(!xref.insert(999, 101));
        assert_eq!(xref.target_for(1), Some(101));
        assert_eq!(xref.source_for(101), Some(1));
        assert_eq!(xref.len(), 1);
    }

    #[test]
    fn lookup_misses_return_none() {
        let xref = CrossReference::new();
        assert!(xref.is_empty());
        assert_eq!(xref.target_for(5), None);
        assert_eq!(xref.source_for(5), None);
    }
}
