//! Domain models for the `AuthN` resolver module.

use chrono::{DateTime, Utc};
use postgate_security::Principal;
use serde::{Deserialize, Serialize};

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// The resolved identity with the scopes granted at issuance.
    pub principal: Principal,
    /// Token identifier (`jti`) when the token format carries one.
    pub token_id: Option<String>,
    /// Token expiry, if the token expires.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Claim set carried by JWT access tokens.
///
/// Follows the convention of the issuing OAuth server:
/// - personal access tokens set `sub` to the user id;
/// - client-credentials tokens leave `sub` empty and identify the client via `aud`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User id for personal tokens; empty for client-credentials tokens.
    #[serde(default)]
    pub sub: String,
    /// OAuth client id the token was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Token identifier used for revocation lookups.
    pub jti: String,
    /// Expiry (seconds since the Unix epoch).
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl AccessTokenClaims {
    /// Whether these claims describe a client-credentials token.
    #[must_use]
    pub fn is_client_credentials(&self) -> bool {
        self.sub.trim().is_empty()
    }
}
