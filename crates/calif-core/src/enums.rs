//! Grading mode, progress status, and review decisions.
//!
//! All enums use `snake_case` serialization.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// GradingMode
// ---------------------------------------------------------------------------

/// Unit of grading: a single student, or a team sharing one artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GradingMode {
    Individual,
    #[serde(rename = "equipos", alias = "teams")]
    Teams,
}

impl GradingMode {
    #[must_use]
    pub const fn from_individual_flag(individual: bool) -> Self {
        if individual {
            Self::Individual
        } else {
            Self::Teams
        }
    }

    #[must_use]
    pub const fn is_individual(self) -> bool {
        matches!(self, Self::Individual)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Teams => "equipos",
        }
    }
}

impl fmt::Display for GradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProgressStatus
// ---------------------------------------------------------------------------

/// Status of a grading workspace's review session.
///
/// See [`Self::from_counts`] for the statuses read back from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Paused,
    Completed,
}

impl ProgressStatus {
    /// Status implied by persisted progress alone.
    ///
    /// `Paused` is never derived: it only exists between a pause decision and
    /// the next resume.
    #[must_use]
    pub const fn from_counts(completed: usize, total: usize) -> Self {
        if completed == 0 {
            Self::NotStarted
        } else if completed >= total {
            Self::Completed
        } else {
            Self::InProgress
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReviewDecision
// ---------------------------------------------------------------------------

/// Operator decision for one pending item in a review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    /// Feedback produced; record the item as completed.
    Complete,
    /// Leave the item pending and move on.
    Skip,
    /// Stop the session, keeping what was already recorded.
    Pause,
}

impl ReviewDecision {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Skip => "skip",
            Self::Pause => "pause",
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
