//! # DomainError
//!
//! Centralized error handling for prompt-board.
//! Maps domain-specific failures to actionable error types.

use std::fmt;

use thiserror::Error;

/// The mutation an authorization check was guarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Edit => f.write_str("edit"),
            Action::Delete => f.write_str("delete"),
        }
    }
}

/// The primary error type for all prompt operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// No prompt with this id (or the id is not a valid identifier)
    #[error("prompt not found with ID {0}")]
    NotFound(String),

    /// The requesting address neither created the prompt nor is an admin
    #[error("forbidden: address may not {0} this prompt")]
    Forbidden(Action),

    /// A required form field is missing or blank
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Storage backend failure (connection lost, disk full, ...)
    #[error("storage unavailable: {0:#}")]
    StorageUnavailable(anyhow::Error),

    /// Anything else that should surface as a server error
    #[error("internal service error: {0}")]
    Internal(String),
}

/// A specialized Result type for prompt-board logic.
pub type Result<T> = std::result::Result<T, DomainError>;
