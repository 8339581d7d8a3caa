use class_core::{ActivationError, PersistenceError};
use thiserror::Error;

use crate::repository::RepositoryError;

/// Runtime errors
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Repository operation failed
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Character blob could not be encoded or decoded
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Active-class change rejected
    #[error(transparent)]
    Activation(#[from] ActivationError),

    /// Balance or script file could not be loaded
    #[error("{0}")]
    Content(String),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
