//! Mapping-table rules and the resolved column map.

use std::collections::BTreeMap;

use crate::types::{FileCategory, TypeTag};

/// One row of the declarative mapping table, as loaded. Field names
/// are still unqualified; qualification happens when the column map
/// is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule {
    pub source_field: String,
    pub source_category: FileCategory,
    pub source_type: Option<TypeTag>,
    pub target_field: String,
    /// Raw target category label; only the secondary-report category
    /// yields a column-name suffix.
    pub target_category: String,
    pub target_type: Option<TypeTag>,
}

impl MappingRule {
    /// A rule with either field name blank carries no information and
    /// is dropped before the column map is built.
    pub fn is_valid(&self) -> bool {
        !self.source_field.trim().is_empty() && !self.target_field.trim().is_empty()
    }
}

/// One resolved column pair: fully qualified names on both sides plus
/// the declared tags and the tag comparisons actually run under.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPair {
    pub source_column: String,
    pub target_column: String,
    pub source_type: TypeTag,
    pub target_type: TypeTag,
    /// Tag both sides are coerced to before equivalence testing. The
    /// target schema is authoritative; in particular a numeric target
    /// tag always overrides the source tag.
    pub comparison_type: TypeTag,
}

impl ColumnPair {
    /// Key used for per-variable statistics.
    pub fn label(&self) -> String {
        format!("{} -> {}", self.source_column, self.target_column)
    }
}

/// Resolved column mapping, keyed by qualified source column name.
///
/// Preserves mapping-table order for iteration. A later rule with the
/// same source column overwrites the earlier pair in place, so
/// last-write-wins on content while position stays deterministic.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    pairs: Vec<ColumnPair>,
    index: BTreeMap<String, usize>,
}

impl ColumnMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pair: ColumnPair) {
        match self.index.get(&pair.source_column) {
            Some(&position) => self.pairs[position] = pair,
            None => {
                self.index.insert(pair.source_column.clone(), self.pairs.len());
                self.pairs.push(pair);
            }
        }
    }

    pub fn get(&self, source_column: &str) -> Option<&ColumnPair> {
        self.index
            .get(source_column)
            .map(|&position| &self.pairs[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnPair> {
        self.pairs.iter()
    }

    /// Qualified source column names in mapping-table order.
    pub fn source_columns(&self) -> Vec<String> {
        self.pairs
            .iter()
            .map(|pair| pair.source_column.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<'a> IntoIterator for &'a ColumnMap {
    type Item = &'a ColumnPair;
    type IntoIter = std::slice::Iter<'a, ColumnPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
