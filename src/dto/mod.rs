//! Request payloads and their field checks.

pub mod categories;
pub mod customers;
pub mod orders;
pub mod products;

use crate::error::{AppError, AppResult};

/// Non-blank and at most `max` characters.
pub(crate) fn require(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    limit(field, value, max)
}

/// At most `max` characters.
pub(crate) fn limit(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert!(matches!(require("name", "   ", 10), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(limit("name", "çğüşöı", 6).is_ok());
        assert!(limit("name", "çğüşöıx", 6).is_err());
    }
}
