//! Domain errors for the `AuthN` resolver.

use authn_resolver_sdk::{AuthNResolverError, TokenRejection};

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("unauthorized: {0}")]
    Unauthorized(TokenRejection),

    #[error("revocation store unavailable: {0}")]
    RevocationUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AuthNResolverError> for DomainError {
    fn from(e: AuthNResolverError) -> Self {
        match e {
            AuthNResolverError::Unauthorized(rejection) => Self::Unauthorized(rejection),
            AuthNResolverError::ServiceUnavailable(msg) => Self::RevocationUnavailable(msg),
            AuthNResolverError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<DomainError> for AuthNResolverError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Unauthorized(rejection) => Self::Unauthorized(rejection),
            DomainError::RevocationUnavailable(msg) => Self::ServiceUnavailable(msg),
            DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}
