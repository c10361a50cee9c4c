//! Public API traits for the `AuthN` resolver.

use async_trait::async_trait;

use crate::error::AuthNResolverError;
use crate::models::AuthenticationResult;

/// Resolves a bearer token into a [`Principal`](postgate_security::Principal).
///
/// Implementations are side-effect free: the only storage access allowed is a
/// read-only token lookup (see [`TokenRevocationStore`]).
///
/// ```ignore
/// let result = authn.authenticate("eyJ0eXAiOiJKV1Qi...").await?;
/// let principal = result.principal;
/// ```
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    /// Authenticate a bearer token and return the validated identity.
    ///
    /// # Arguments
    ///
    /// * `bearer_token` - The raw bearer token string (without "Bearer " prefix)
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if the token is missing, malformed, expired, or revoked
    /// - `ServiceUnavailable` if the revocation lookup is unreachable
    /// - `Internal` for unexpected errors
    async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError>;
}

/// Read-only lookup of revoked token identifiers (`jti`).
///
/// The token-issuing service owns revocation; authenticators only ask.
#[async_trait]
pub trait TokenRevocationStore: Send + Sync {
    /// Whether the token with the given identifier has been revoked.
    ///
    /// # Errors
    ///
    /// Returns `ServiceUnavailable` when the backing store cannot be reached.
    async fn is_revoked(&self, token_id: &str) -> Result<bool, AuthNResolverError>;
}
