//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input). Recoverable by the
    /// caller re-prompting.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested document was not found. May be transient (read-after-write
    /// latency right after signup) or terminal depending on context.
    #[error("not found")]
    NotFound,

    /// A conflict occurred (e.g. stale version / concurrent modification).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authorization failure. Non-retryable without a role change.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Whether re-invoking the failed operation with the same input can ever
    /// succeed (conflicts and transient missing documents can clear up).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_) | Self::NotFound)
    }
}
