//! Error types raised by store implementations.

use gacha_core::{ErrorSeverity, GameError};
use thiserror::Error;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("store lock was poisoned")]
    LockPoisoned,

    #[error("value under {key} is not a {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

impl GameError for RepositoryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "REPOSITORY_LOCK_POISONED",
            Self::TypeMismatch { .. } => "REPOSITORY_TYPE_MISMATCH",
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
