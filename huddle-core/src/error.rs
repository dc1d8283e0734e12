use thiserror::Error;

use crate::domain::users::auth::AuthCryptoError;
use crate::domain::validation::ValidationError;

#[derive(Error, Debug)]
pub enum HuddleError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// A registration or draft window has closed.
    #[error("{0}")]
    Closed(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for HuddleError {
    fn from(err: ValidationError) -> Self {
        HuddleError::Validation(err.to_string())
    }
}

impl From<AuthCryptoError> for HuddleError {
    fn from(err: AuthCryptoError) -> Self {
        HuddleError::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HuddleError>;
