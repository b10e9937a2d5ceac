//! Error type for rejected arguments at the public call boundary.
//!
//! Internal consistency violations (objective diverging from the conflict
//! matrix, malformed swaps) are *not* represented here; those are
//! programming errors and abort via assertion.

use thiserror::Error;

/// Errors reported for invalid configuration or out-of-range indices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SgpError {
    /// Problem dimensions that cannot form a schedule.
    #[error("invalid problem size: {groups} group(s) of {group_size} over {weeks} week(s)")]
    InvalidDimensions {
        groups: usize,
        group_size: usize,
        weeks: usize,
    },

    /// Week index outside the schedule.
    #[error("week index {week} out of range (schedule has {weeks} weeks)")]
    WeekOutOfRange { week: usize, weeks: usize },

    /// Group index outside a week.
    #[error("group index {group} out of range (weeks have {groups} groups)")]
    GroupOutOfRange { group: usize, groups: usize },

    /// Tabu tenure bounds with `min > max`.
    #[error("tabu tenure bounds inverted: min {min} > max {max}")]
    InvalidTenureBounds { min: u64, max: u64 },
}
