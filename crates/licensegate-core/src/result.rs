//! Convenience result type alias for LicenseGate.

use crate::error::AppError;

/// A specialized `Result` type for LicenseGate operations.
pub type AppResult<T> = Result<T, AppError>;
