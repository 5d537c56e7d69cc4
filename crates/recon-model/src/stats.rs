//! Agreement counters and derived statistics.

use serde::Serialize;

/// Outcome of comparing one column pair for one matched identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Match,
    Mismatch,
    MissingInSource,
    MissingInTarget,
}

/// Raw agreement counters, accumulated at overall, monthly and
/// per-variable level during a single reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComparisonStats {
    pub matches: u64,
    pub mismatches: u64,
    pub missing_in_source: u64,
    pub missing_in_target: u64,
}

impl ComparisonStats {
    pub fn record(&mut self, outcome: Classification) {
        match outcome {
            Classification::Match => self.matches += 1,
            Classification::Mismatch => self.mismatches += 1,
            Classification::MissingInSource => self.missing_in_source += 1,
            Classification::MissingInTarget => self.missing_in_target += 1,
        }
    }

    /// Every classified comparison counts, including one-sided
    /// missing values.
    pub fn total_compared(&self) -> u64 {
        self.matches + self.mismatches + self.missing_in_source + self.missing_in_target
    }

    /// Derive the nine-field summary. All percentages are 0 when
    /// nothing was compared.
    pub fn summary(&self) -> StatsSummary {
        let total = self.total_compared();
        StatsSummary {
            matches: self.matches,
            mismatches: self.mismatches,
            missing_in_source: self.missing_in_source,
            missing_in_target: self.missing_in_target,
            total_compared: total,
            match_percent: percent(self.matches, total),
            mismatch_percent: percent(self.mismatches, total),
            missing_in_source_percent: percent(self.missing_in_source, total),
            missing_in_target_percent: percent(self.missing_in_target, total),
        }
    }
}

/// Fixed-shape statistics record handed to report writers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSummary {
    pub matches: u64,
    pub mismatches: u64,
    pub missing_in_source: u64,
    pub missing_in_target: u64,
    pub total_compared: u64,
    pub match_percent: f64,
    pub mismatch_percent: f64,
    pub missing_in_source_percent: f64,
    pub missing_in_target_percent: f64,
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(count as f64 / total as f64 * 100.0)
}

/// Round to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// English month name for a 1-based calendar month.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_sum_to_total() {
        let mut stats = ComparisonStats::default();
        stats.record(Classification::Match);
        stats.record(Classification::Match);
        stats.record(Classification::Mismatch);
        stats.record(Classification::MissingInSource);
        stats.record(Classification::MissingInTarget);
        assert_eq!(stats.total_compared(), 5);

        let summary = stats.summary();
        assert_eq!(
            summary.matches
                + summary.mismatches
                + summary.missing_in_source
                + summary.missing_in_target,
            summary.total_compared
        );
    }

    #[test]
    fn percentages_sum_to_about_100() {
        let stats = ComparisonStats {
            matches: 100,
            mismatches: 10,
            missing_in_source: 7,
            missing_in_target: 3,
        };
        let summary = stats.summary();
        let sum = summary.match_percent
            + summary.mismatch_percent
            + summary.missing_in_source_percent
            + summary.missing_in_target_percent;
        assert!((sum - 100.0).abs() <= 0.04, "sum was {sum}");
    }

    #[test]
    fn empty_stats_have_zero_percentages() {
        let summary = ComparisonStats::default().summary();
        assert_eq!(summary.total_compared, 0);
        assert_eq!(summary.match_percent, 0.0);
        assert_eq!(summary.mismatch_percent, 0.0);
        assert_eq!(summary.missing_in_source_percent, 0.0);
        assert_eq!(summary.missing_in_target_percent, 0.0);
    }

    #[test]
    fn monthly_percentages_match_reference() {
        let april = ComparisonStats {
            matches: 100,
            mismatches: 10,
            missing_in_source: 6,
            missing_in_target: 4,
        };
        let summary = april.summary();
        assert_eq!(summary.total_compared, 120);
        assert_eq!(summary.match_percent, 83.33);
        assert_eq!(summary.mismatch_percent, 8.33);
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(4), "April");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "Unknown");
    }
}
