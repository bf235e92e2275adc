use thiserror::Error;

/// Domain errors surfaced by store operations.
///
/// The three data-shaped kinds are terminal for the triggering operation:
/// the caller must correct its input (`Validation`), reference an existing
/// entity (`NotFound`), or pick different input (`Conflict`). `Storage`
/// wraps unexpected storage-layer failures and signals a non-deterministic
/// problem rather than a data one.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        DomainError::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        DomainError::Conflict(msg.into())
    }
}
