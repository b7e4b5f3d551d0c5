//! Convenience result type alias for Skirmish.

use crate::error::AppError;

/// A specialized `Result` type for Skirmish operations.
pub type AppResult<T> = Result<T, AppError>;
