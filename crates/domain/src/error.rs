//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A variable name is invalid or empty.
    #[error("invalid variable name: {0}")]
    InvalidName(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Checks that an identifier is non-blank and returns it trimmed.
///
/// # Errors
/// Returns `DomainError::InvalidIdentifier` naming `what` when the value is blank.
pub fn require_identifier(what: &str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidIdentifier(format!(
            "{what} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Checks that a variable name is non-blank.
///
/// Names are kept verbatim; only whitespace-only names are rejected.
///
/// # Errors
/// Returns `DomainError::InvalidName` when the name is blank.
pub fn require_name(name: &str) -> DomainResult<String> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(
            "variable name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}
