//! Error types for time-slice operations.

use thiserror::Error;

/// Construction-time failures.
///
/// Lookups that simply miss (an index past the end, a timestamp outside the
/// range) are not errors; they return `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SliceError {
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),
}

pub type Result<T> = std::result::Result<T, SliceError>;
