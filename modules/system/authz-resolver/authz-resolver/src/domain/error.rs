use authn_resolver_sdk::AuthNResolverError;
use authz_resolver_sdk::{AuthZResolverError, Denial, DenyReason};
use uuid::Uuid;

/// Why the pipeline stopped before reaching `Allowed`.
///
/// A denial is a decision, the other variants are failures. [`Self::into_outcome`]
/// splits the two for the public API.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("denied: {}", .0.reason)]
    Denied(Denial),

    #[error("resource not found: {0}")]
    NotFound(Uuid),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// `Ok(denial)` for decisions, `Err` for failures.
    ///
    /// # Errors
    ///
    /// Returns the SDK error for every non-denial variant.
    pub fn into_outcome(self) -> Result<Denial, AuthZResolverError> {
        match self {
            Self::Denied(denial) => Ok(denial),
            other => Err(other.into()),
        }
    }
}

impl From<DenyReason> for DomainError {
    fn from(reason: DenyReason) -> Self {
        Self::Denied(Denial::new(reason))
    }
}

impl From<Denial> for DomainError {
    fn from(denial: Denial) -> Self {
        Self::Denied(denial)
    }
}

impl From<AuthNResolverError> for DomainError {
    fn from(e: AuthNResolverError) -> Self {
        match e {
            AuthNResolverError::Unauthorized(_) => DenyReason::Unauthenticated.into(),
            AuthNResolverError::ServiceUnavailable(msg) => Self::ServiceUnavailable(msg),
            AuthNResolverError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<AuthZResolverError> for DomainError {
    fn from(e: AuthZResolverError) -> Self {
        match e {
            AuthZResolverError::NotFound(id) => Self::NotFound(id),
            AuthZResolverError::Persistence(msg) => Self::Persistence(msg),
            AuthZResolverError::ServiceUnavailable(msg) => Self::ServiceUnavailable(msg),
            AuthZResolverError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<DomainError> for AuthZResolverError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(id) => Self::NotFound(id),
            DomainError::Persistence(msg) => Self::Persistence(msg),
            DomainError::ServiceUnavailable(msg) => Self::ServiceUnavailable(msg),
            DomainError::Internal(msg) => Self::Internal(msg),
            DomainError::Denied(denial) => {
                Self::Internal(format!("denial escaped the pipeline: {}", denial.reason))
            }
        }
    }
}
