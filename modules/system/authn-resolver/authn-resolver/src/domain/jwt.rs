//! JWT access token validation.

use std::sync::Arc;

use authn_resolver_sdk::{
    AccessTokenClaims, AuthenticationResult, TokenRejection, TokenRevocationStore,
};
use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use postgate_security::{Principal, PrincipalKind};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use super::error::DomainError;

/// Validates HS256 access tokens and resolves their principal.
///
/// Checks, in order: signature, `exp` (mandatory), `iss` when configured,
/// identity claims, then revocation of the `jti`.
pub struct JwtAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
    revocations: Arc<dyn TokenRevocationStore>,
}

impl JwtAuthenticator {
    #[must_use]
    pub fn new(
        secret: &SecretString,
        issuer: Option<&str>,
        leeway_secs: u64,
        revocations: Arc<dyn TokenRevocationStore>,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        validation.validate_exp = true;
        // `aud` carries the client id, not an audience restriction.
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
            revocations,
        }
    }

    /// Authenticate a raw JWT.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` when the token fails any validation step
    /// - `RevocationUnavailable` when the revocation lookup fails
    pub async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, DomainError> {
        if bearer_token.is_empty() {
            return Err(DomainError::Unauthorized(TokenRejection::Missing));
        }

        let claims = decode::<AccessTokenClaims>(bearer_token, &self.decoding_key, &self.validation)
            .map_err(|e| DomainError::Unauthorized(rejection_for(&e)))?
            .claims;

        let principal = principal_from_claims(&claims)?;

        if self.revocations.is_revoked(&claims.jti).await? {
            return Err(DomainError::Unauthorized(TokenRejection::Revoked));
        }

        let expires_at = i64::try_from(claims.exp)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        Ok(AuthenticationResult {
            principal,
            token_id: Some(claims.jti),
            expires_at,
        })
    }
}

fn rejection_for(err: &jsonwebtoken::errors::Error) -> TokenRejection {
    match err.kind() {
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        ErrorKind::InvalidSignature => TokenRejection::InvalidSignature,
        _ => TokenRejection::Malformed,
    }
}

/// Resolve kind and id from the issuance convention: a personal token names
/// its user in `sub`, a client-credentials token names its client in `aud`.
fn principal_from_claims(claims: &AccessTokenClaims) -> Result<Principal, DomainError> {
    let (kind, raw_id) = if claims.is_client_credentials() {
        (PrincipalKind::Client, claims.aud.as_deref().unwrap_or_default())
    } else {
        (PrincipalKind::User, claims.sub.as_str())
    };

    let id = Uuid::parse_str(raw_id.trim())
        .map_err(|_| DomainError::Unauthorized(TokenRejection::Malformed))?;

    Ok(Principal::builder()
        .id(id)
        .kind(kind)
        .scopes(claims.scopes.iter().cloned())
        .build())
}
