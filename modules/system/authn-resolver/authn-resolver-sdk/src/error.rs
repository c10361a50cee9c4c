//! Error types for the `AuthN` resolver module.

use thiserror::Error;

/// Why a bearer token was rejected.
///
/// Never echoed to clients; used for logs and tests only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("missing bearer token")]
    Missing,
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token revoked")]
    Revoked,
    #[error("unknown token")]
    Unknown,
}

/// Errors that can occur when using the `AuthN` resolver API.
#[derive(Debug, Error)]
pub enum AuthNResolverError {
    /// The token is missing, malformed, expired, or revoked.
    #[error("unauthorized: {0}")]
    Unauthorized(TokenRejection),

    /// A collaborator (revocation store) is not reachable.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthNResolverError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}
