use authz_resolver_sdk::{AuthZResolverError, Denial, DenyReason};
use posts_sdk::PostsError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("access denied: {}", .0.reason)]
    Denied(Denial),

    #[error("Post not found: {0}")]
    NotFound(Uuid),

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Authorization unavailable: {0}")]
    Unavailable(String),
}

impl DomainError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    #[must_use]
    pub fn forbidden() -> Self {
        Self::Denied(Denial::new(DenyReason::Forbidden))
    }
}

impl From<AuthZResolverError> for DomainError {
    fn from(e: AuthZResolverError) -> Self {
        match e {
            AuthZResolverError::NotFound(id) => Self::NotFound(id),
            AuthZResolverError::Persistence(msg) => Self::Storage(msg),
            AuthZResolverError::ServiceUnavailable(msg) | AuthZResolverError::Internal(msg) => {
                tracing::error!(error = %msg, "AuthZ decision failed");
                Self::Unavailable(msg)
            }
        }
    }
}

impl From<DomainError> for PostsError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Denied(denial) => match denial.reason {
                DenyReason::Unauthenticated => Self::Unauthenticated,
                DenyReason::InsufficientScope => Self::InsufficientScope,
                DenyReason::Forbidden => Self::Forbidden,
                DenyReason::RateLimited => Self::RateLimited {
                    retry_after_secs: denial.retry_after_secs().unwrap_or_default(),
                },
            },
            DomainError::NotFound(id) => Self::not_found(id),
            DomainError::Validation { field, message } => Self::validation(field, message),
            DomainError::Storage(_) => Self::Persistence,
            DomainError::Unavailable(_) => Self::Unavailable,
        }
    }
}
