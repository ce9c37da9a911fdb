//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the taxonomy tree invariants.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("invalid parent reference for node: {0}")]
    InvalidParent(String),

    #[error("invalid snapshot: {message}")]
    InvalidSnapshot { message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
