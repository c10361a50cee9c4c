use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the posts module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostsError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("token lacks the required scope")]
    InsufficientScope,

    #[error("forbidden")]
    Forbidden,

    #[error("too many attempts, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("post not found: {id}")]
    NotFound { id: Uuid },

    #[error("validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("storage failure")]
    Persistence,

    #[error("service unavailable")]
    Unavailable,
}

impl PostsError {
    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}
