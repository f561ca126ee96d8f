//! Error taxonomy for the reconciliation core.

use thiserror::Error;

/// Result type used across the billing domain.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is local and non-retryable: the caller gets it verbatim and
/// decides what to do. None of these is fatal to the process, and none of
/// them leaves a partial write behind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or out-of-range input (zero claim amount, empty description).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The identity has no relationship or role granting the operation.
    #[error("unauthorized")]
    Unauthorized,

    /// Unknown invoice or payment id.
    #[error("not found")]
    NotFound,

    /// A status transition raced another writer or hit a terminal row.
    /// Callers must re-fetch state rather than retry blindly.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An identifier failed to parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A domain invariant broke (arithmetic overflow on totals, etc.).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The ledger store itself failed (poisoned lock, backend outage).
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }
}
