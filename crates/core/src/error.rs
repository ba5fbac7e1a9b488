//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic domain failure.
///
/// Only the failures the domain actually raises live here: input validation,
/// identifier parsing, and write conflicts. Infrastructure concerns carry
/// their own error types next to the stores.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank employee name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier string failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A conflicting write (stale sequence, duplicate registration).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
