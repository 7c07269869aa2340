//! Error types. Application errors are `anyhow::Error`; problems with user-submitted data are a
//! typed `ValidationError` so that callers can report them without treating them as failures.

use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The message shown to the user whenever a submitted transaction is rejected.
pub const FILL_ALL_FIELDS: &str = "Fill all fields correctly";

/// A submitted transaction is missing a required field or has a malformed one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Fill all fields correctly: title must not be empty")]
    EmptyTitle,
    #[error("Fill all fields correctly: amount '{0}' is not a positive number")]
    InvalidAmount(String),
    #[error("Fill all fields correctly: type '{0}' must be 'income' or 'expense'")]
    InvalidType(String),
    #[error("Fill all fields correctly: date must not be empty")]
    EmptyDate,
    #[error("Fill all fields correctly: category must not be empty")]
    EmptyCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_start_with_fill_all_fields() {
        let errors = [
            ValidationError::EmptyTitle,
            ValidationError::InvalidAmount("-1".into()),
            ValidationError::InvalidType("gift".into()),
            ValidationError::EmptyDate,
            ValidationError::EmptyCategory,
        ];
        for e in errors {
            assert!(e.to_string().starts_with(FILL_ALL_FIELDS), "{e}");
        }
    }

    #[test]
    fn test_invalid_amount_names_the_input() {
        let e = ValidationError::InvalidAmount("abc".into());
        assert!(e.to_string().contains("'abc'"));
    }
}
