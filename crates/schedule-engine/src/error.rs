//! Error types for schedule-engine operations.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum ScheduleError {
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid day window: {0}")]
    InvalidWindow(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;

/// A non-fatal problem found while projecting a schedule.
///
/// `entry` is the position of the offending meeting in the input slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionWarning {
    /// The meeting's time range could not be read; it contributes nothing.
    SkippedEntry { entry: usize, error: ScheduleError },
    /// A character in the day pattern matched no weekday and was ignored.
    UnrecognizedDayToken { entry: usize, token: char },
}

impl std::fmt::Display for ProjectionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SkippedEntry { entry, error } => {
                write!(f, "entry {entry} skipped: {error}")
            }
            Self::UnrecognizedDayToken { entry, token } => {
                write!(f, "entry {entry}: unrecognized day token '{token}'")
            }
        }
    }
}
