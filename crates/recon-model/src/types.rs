//! Declared type tags and source file categories.
//!
//! The mapping table declares variable types as free text
//! (`"int"`, `"float-2"`, `"datetime"`). Tags are resolved into this
//! closed enum once, when the mapping table is loaded, so no string
//! pattern matching happens per cell.

use std::fmt;

use serde::{Serialize, Serializer};

/// Declared type of a mapped variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Int,
    Float,
    /// Float compared after rounding to the given number of decimal
    /// digits (round half to even).
    FloatN(u32),
    Bool,
    Date,
    Str,
}

impl TypeTag {
    /// Parse a mapping-table type label. Returns `None` for blank or
    /// unrecognized labels so the caller can apply its own fallback.
    pub fn parse(raw: &str) -> Option<Self> {
        let label = raw.trim().to_ascii_lowercase();
        if label.is_empty() {
            return None;
        }
        match label.as_str() {
            "int" | "integer" | "bigint" => return Some(Self::Int),
            "float" | "double" | "decimal" => return Some(Self::Float),
            "bool" | "boolean" => return Some(Self::Bool),
            "date" | "datetime" | "timestamp" | "time" => return Some(Self::Date),
            "str" | "string" | "text" => return Some(Self::Str),
            _ => {}
        }
        if let Some(digits) = label.strip_prefix("float-") {
            if let Ok(precision) = digits.parse::<u32>() {
                return Some(Self::FloatN(precision));
            }
        }
        None
    }

    /// True for the integer and float families. A numeric target tag
    /// overrides the source tag when resolving comparisons.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::FloatN(_))
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::FloatN(precision) => write!(f, "float-{precision}"),
            Self::Bool => write!(f, "bool"),
            Self::Date => write!(f, "date"),
            Self::Str => write!(f, "str"),
        }
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Source-subsystem category of an export file. Each category owns a
/// column-name prefix so merged source columns stay unambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FileCategory {
    Encounter,
    Flowsheet,
    Imaging,
    Lab,
    Medication,
    Monitor,
    Other,
}

impl FileCategory {
    /// All categories in merge order: encounters form the base table,
    /// the remaining subsystems join onto it.
    pub const MERGE_ORDER: [Self; 6] = [
        Self::Encounter,
        Self::Flowsheet,
        Self::Imaging,
        Self::Lab,
        Self::Medication,
        Self::Monitor,
    ];

    /// Column-name prefix for this category. `Other` has none.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Encounter => "enct.",
            Self::Flowsheet => "flow.",
            Self::Imaging => "img.",
            Self::Lab => "lab.",
            Self::Medication => "med.",
            Self::Monitor => "mon.",
            Self::Other => "",
        }
    }

    /// Classify a mapping-table category label.
    pub fn from_label(raw: &str) -> Self {
        Self::classify(&raw.trim().to_ascii_lowercase())
    }

    /// Classify an export file by its stem (`encounters.csv`,
    /// `stroke_flowsheet.csv`, ...).
    pub fn from_file_stem(stem: &str) -> Self {
        Self::classify(&stem.to_ascii_lowercase())
    }

    fn classify(name: &str) -> Self {
        if name.contains("enc") {
            Self::Encounter
        } else if name.contains("flow") {
            Self::Flowsheet
        } else if name.contains("imag") || name.contains("img") {
            Self::Imaging
        } else if name.contains("lab") {
            Self::Lab
        } else if name.contains("med") {
            Self::Medication
        } else if name.contains("mon") {
            Self::Monitor
        } else {
            Self::Other
        }
    }
}
