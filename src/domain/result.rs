//! Result type alias for jamf-batch

use super::errors::BatchError;

/// Result type alias using [`BatchError`]
///
/// # Examples
///
/// ```
/// use jamf_batch::domain::result::Result;
/// use jamf_batch::domain::errors::BatchError;
///
/// fn failing_function() -> Result<()> {
///     Err(BatchError::Validation("Invalid input".to_string()))
/// }
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, BatchError>;
