//! Result type alias for PHI Guard

use super::errors::PhiGuardError;

/// Result type alias for PHI Guard operations
///
/// # Examples
///
/// ```
/// use phi_guard::domain::result::Result;
/// use phi_guard::domain::errors::PhiGuardError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PhiGuardError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PhiGuardError>;
