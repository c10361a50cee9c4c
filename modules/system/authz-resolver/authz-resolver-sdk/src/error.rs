//! Error types for the `AuthZ` resolver module.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when using the `AuthZ` resolver API.
///
/// These represent lookup and infrastructure failures only.
/// Access denial is expressed via [`AuthDecision::Denied`](crate::AuthDecision),
/// not as an error variant.
#[derive(Debug, Error)]
pub enum AuthZResolverError {
    /// The target resource does not exist. Only reported after the caller
    /// has been authenticated and scope-checked.
    #[error("resource not found: {0}")]
    NotFound(Uuid),

    /// The resource owner lookup failed in the storage layer.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// A collaborator (token validation backend) is not available.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
