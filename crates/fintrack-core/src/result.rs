//! Result type aliases for Fintrack.

use crate::FintrackError;

/// A specialized `Result` type for Fintrack operations.
pub type FintrackResult<T> = Result<T, FintrackError>;
