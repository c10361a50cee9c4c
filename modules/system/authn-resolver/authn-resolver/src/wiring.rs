//! Construction of the `AuthN` resolver from configuration.

use std::sync::Arc;

use authn_resolver_sdk::{TokenAuthenticator, TokenRevocationStore};
use tracing::info;

use crate::config::{AuthNMode, AuthNResolverConfig};
use crate::domain::{
    AuthNResolverLocalClient, InMemoryRevocationList, JwtAuthenticator, Service,
    StaticTokenAuthenticator,
};

/// Build the revocation list seeded with `authn.jwt.revoked_token_ids`.
#[must_use]
pub fn build_revocation_list(cfg: &AuthNResolverConfig) -> Arc<InMemoryRevocationList> {
    let list = InMemoryRevocationList::with_revoked(cfg.jwt.revoked_token_ids.iter().cloned());
    if !list.is_empty() {
        info!(revoked = list.len(), "Loaded revoked token ids");
    }
    Arc::new(list)
}

/// Build the token authenticator selected by `cfg.mode`.
///
/// # Errors
///
/// Fails when `jwt` mode is selected without a signing secret.
pub fn build_authenticator(
    cfg: &AuthNResolverConfig,
    revocations: Arc<dyn TokenRevocationStore>,
) -> anyhow::Result<Arc<dyn TokenAuthenticator>> {
    let service = match cfg.mode {
        AuthNMode::Jwt => {
            let secret = cfg
                .jwt
                .secret
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("authn.jwt.secret is required in `jwt` mode"))?;
            info!(
                issuer = cfg.jwt.issuer.as_deref().unwrap_or("<any>"),
                leeway_secs = cfg.jwt.leeway_secs,
                "Initializing authn_resolver with JWT backend"
            );
            Service::jwt(JwtAuthenticator::new(
                secret,
                cfg.jwt.issuer.as_deref(),
                cfg.jwt.leeway_secs,
                revocations,
            ))
        }
        AuthNMode::StaticTokens => {
            tracing::warn!(
                token_count = cfg.tokens.len(),
                "AuthN resolver is running in `static_tokens` mode. Do NOT use this mode in production."
            );
            Service::static_tokens(StaticTokenAuthenticator::from_mappings(&cfg.tokens))
        }
    };

    Ok(Arc::new(AuthNResolverLocalClient::new(Arc::new(service))))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::{IdentityConfig, JwtConfig, TokenMapping};
    use authn_resolver_sdk::{AccessTokenClaims, AuthNResolverError, TokenRejection};
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use postgate_security::PrincipalKind;
    use secrecy::SecretString;
    use uuid::Uuid;

    const SECRET: &str = "wiring-secret";

    fn mint(jti: &str) -> String {
        let claims = AccessTokenClaims {
            sub: Uuid::new_v4().to_string(),
            aud: None,
            jti: jti.to_owned(),
            exp: u64::try_from(Utc::now().timestamp()).unwrap() + 3600,
            iat: None,
            iss: None,
            scopes: vec!["manage-posts".to_owned()],
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn jwt_mode_requires_secret() {
        let cfg = AuthNResolverConfig::default();
        let res = build_authenticator(&cfg, Arc::new(InMemoryRevocationList::new()));
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn jwt_ids_revoked_in_config_are_rejected() {
        let cfg = AuthNResolverConfig {
            jwt: JwtConfig {
                secret: Some(SecretString::from(SECRET.to_owned())),
                revoked_token_ids: vec!["jti-revoked".to_owned()],
                ..JwtConfig::default()
            },
            ..AuthNResolverConfig::default()
        };

        let authn = build_authenticator(&cfg, build_revocation_list(&cfg)).unwrap();

        match authn.authenticate(&mint("jti-revoked")).await {
            Err(AuthNResolverError::Unauthorized(TokenRejection::Revoked)) => {}
            other => panic!("expected Unauthorized(Revoked), got {other:?}"),
        }
        assert!(authn.authenticate(&mint("jti-live")).await.is_ok());
    }

    #[tokio::test]
    async fn static_mode_authenticates_through_trait_object() {
        let subject_id = Uuid::new_v4();
        let cfg = AuthNResolverConfig {
            mode: AuthNMode::StaticTokens,
            tokens: vec![TokenMapping {
                token: "t-1".to_owned(),
                identity: IdentityConfig {
                    subject_id,
                    kind: PrincipalKind::User,
                    token_scopes: vec!["manage-posts".to_owned()],
                },
                expires_at: None,
                revoked: false,
            }],
            ..AuthNResolverConfig::default()
        };

        let authn = build_authenticator(&cfg, Arc::new(InMemoryRevocationList::new())).unwrap();

        let result = authn.authenticate("t-1").await.unwrap();
        assert_eq!(result.principal.id(), subject_id);

        match authn.authenticate("t-2").await {
            Err(AuthNResolverError::Unauthorized(TokenRejection::Unknown)) => {}
            other => panic!("expected Unauthorized(Unknown), got {other:?}"),
        }
    }
}
