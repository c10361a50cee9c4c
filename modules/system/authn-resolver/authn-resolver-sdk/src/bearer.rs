//! `Authorization` header parsing.

use crate::error::{AuthNResolverError, TokenRejection};

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// # Errors
///
/// `Unauthorized(Missing)` when the header is absent, uses another scheme,
/// or carries an empty token.
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthNResolverError> {
    header
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthNResolverError::Unauthorized(TokenRejection::Missing))
}
