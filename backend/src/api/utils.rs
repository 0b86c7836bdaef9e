//! API utility functions
//!
//! Shared router state and input validation used by the handlers.

use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

/// State handed to every handler
pub type RouterState = Arc<AppState>;

/// Maximum input length in characters
pub const MAX_INPUT_LENGTH: usize = 10_000;

/// Validate user input length
///
/// Empty input is valid here: sessions ignore it rather than reject it.
///
/// # Returns
/// * `Ok(())` - Input is within limits
/// * `Err(AppError)` - Input is too long
pub fn validate_input(input: &str) -> Result<(), AppError> {
    if input.chars().count() > MAX_INPUT_LENGTH {
        return Err(AppError::InvalidRequest(format!(
            "Input exceeds maximum length of {} characters",
            MAX_INPUT_LENGTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input() {
        assert!(validate_input("").is_ok());
        assert!(validate_input("collection schedule").is_ok());
        assert!(validate_input(&"a".repeat(MAX_INPUT_LENGTH)).is_ok());
        assert!(validate_input(&"a".repeat(MAX_INPUT_LENGTH + 1)).is_err());
    }
}
