//! Configuration for the `AuthN` resolver.

use chrono::{DateTime, Utc};
use postgate_security::PrincipalKind;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthNResolverConfig {
    /// Token validation backend.
    pub mode: AuthNMode,

    /// Settings for the `jwt` backend.
    pub jwt: JwtConfig,

    /// Static token-to-identity mappings for the `static_tokens` backend.
    pub tokens: Vec<TokenMapping>,
}

impl Default for AuthNResolverConfig {
    fn default() -> Self {
        Self {
            mode: AuthNMode::Jwt,
            jwt: JwtConfig::default(),
            tokens: Vec::new(),
        }
    }
}

/// Token validation backend.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthNMode {
    /// Verify HS256-signed JWT access tokens.
    #[default]
    Jwt,
    /// Map specific tokens to specific identities.
    StaticTokens,
}

/// JWT verification settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JwtConfig {
    /// Shared HS256 signing secret. Required in `jwt` mode.
    #[serde(deserialize_with = "deserialize_secret")]
    pub secret: Option<SecretString>,

    /// Expected `iss` claim. Not checked when absent.
    pub issuer: Option<String>,

    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,

    /// `jti` values rejected as revoked.
    pub revoked_token_ids: Vec<String>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            issuer: None,
            leeway_secs: 30,
            revoked_token_ids: Vec::new(),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

/// Identity configuration for a static token.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// User id or client id.
    pub subject_id: Uuid,

    /// Issuance type of the token.
    #[serde(default = "default_kind")]
    pub kind: PrincipalKind,

    /// Scopes granted at issuance.
    #[serde(default)]
    pub token_scopes: Vec<String>,
}

fn default_kind() -> PrincipalKind {
    PrincipalKind::User
}

/// Maps a static token to a specific identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The bearer token value to match.
    pub token: String,
    /// The identity to return when this token is presented.
    pub identity: IdentityConfig,
    /// Tokens past this instant are rejected as expired.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Revoked tokens are rejected.
    #[serde(default)]
    pub revoked: bool,
}
