//! Static token-to-identity mapping for development and testing.

use std::collections::HashMap;

use authn_resolver_sdk::{AuthenticationResult, TokenRejection};
use chrono::Utc;
use postgate_security::Principal;

use super::error::DomainError;
use crate::config::TokenMapping;

/// Static `AuthN` backend.
///
/// Specific tokens map to specific identities. Expiry and revocation are
/// taken from the configured mapping.
pub struct StaticTokenAuthenticator {
    token_map: HashMap<String, TokenMapping>,
}

impl StaticTokenAuthenticator {
    #[must_use]
    pub fn from_mappings(mappings: &[TokenMapping]) -> Self {
        let token_map = mappings
            .iter()
            .map(|m| (m.token.clone(), m.clone()))
            .collect();
        Self { token_map }
    }

    /// Authenticate a bearer token against the configured table.
    ///
    /// # Errors
    ///
    /// `Unauthorized` when the token is empty, unknown, revoked, or expired.
    pub fn authenticate(&self, bearer_token: &str) -> Result<AuthenticationResult, DomainError> {
        if bearer_token.is_empty() {
            return Err(DomainError::Unauthorized(TokenRejection::Missing));
        }

        let mapping = self
            .token_map
            .get(bearer_token)
            .ok_or(DomainError::Unauthorized(TokenRejection::Unknown))?;

        if mapping.revoked {
            return Err(DomainError::Unauthorized(TokenRejection::Revoked));
        }
        if mapping.expires_at.is_some_and(|exp| exp <= Utc::now()) {
            return Err(DomainError::Unauthorized(TokenRejection::Expired));
        }

        let identity = &mapping.identity;
        let principal = Principal::builder()
            .id(identity.subject_id)
            .kind(identity.kind)
            .scopes(identity.token_scopes.iter().cloned())
            .build();

        Ok(AuthenticationResult {
            principal,
            token_id: None,
            expires_at: mapping.expires_at,
        })
    }
}
