//! Deployment-fixed engine configuration.

/// Column designations and reporting scope for one deployment.
///
/// Defaults match the stroke-registry deployment this pipeline was
/// built for: the source id lives in the imaging file, the target
/// case number ends in the numeric target id, and reporting covers
/// April through December.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Source column holding the numeric source-system identifier.
    pub source_id_column: String,
    /// Target column whose trailing digits are the target identifier.
    pub target_case_column: String,
    /// Source column used for month bucketing.
    pub source_date_column: String,
    /// Target column used for month bucketing when the source value
    /// is missing.
    pub target_date_column: String,
    /// First calendar month inside reporting scope (1-based, inclusive).
    pub month_start: u32,
    /// Last calendar month inside reporting scope (inclusive).
    pub month_end: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            source_id_column: "img.FID".to_string(),
            target_case_column: "Case ID".to_string(),
            source_date_column: "enct.arrival_date".to_string(),
            target_date_column: "Arrival at hospital".to_string(),
            month_start: 4,
            month_end: 12,
        }
    }
}

impl EngineConfig {
    /// Whether a month bucket falls inside reporting scope.
    pub fn month_in_range(&self, month: u32) -> bool {
        month >= self.month_start && month <= self.month_end
    }
}
