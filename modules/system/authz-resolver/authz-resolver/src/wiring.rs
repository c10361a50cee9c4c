//! Construction of the `AuthZ` resolver from configuration.

use std::sync::Arc;

use authn_resolver_sdk::TokenAuthenticator;
use authz_resolver_sdk::{ActingUserEnforcement, AuthZResolverClient};
use tracing::info;

use crate::config::{AuthZResolverConfig, MAX_WINDOW_SECS};
use crate::domain::{AuthorizationPipeline, RateLimiter};

/// Build the authorization pipeline.
///
/// # Errors
///
/// Fails when no required scope is configured or when the create rate-limit
/// window is zero or longer than [`MAX_WINDOW_SECS`].
pub fn build_pipeline(
    cfg: &AuthZResolverConfig,
    authn: Arc<dyn TokenAuthenticator>,
    rate_limiter: Arc<RateLimiter>,
) -> anyhow::Result<Arc<dyn AuthZResolverClient>> {
    if cfg.required_scopes.is_empty() {
        anyhow::bail!("authz.required_scopes must name at least one scope");
    }

    let window_secs = cfg.create_rate_limit.window_secs;
    anyhow::ensure!(
        (1..=MAX_WINDOW_SECS).contains(&window_secs),
        "authz.create_rate_limit.window_secs must be between 1 and {MAX_WINDOW_SECS}, got {window_secs}"
    );

    if cfg.acting_user_enforcement == ActingUserEnforcement::Bypass {
        tracing::warn!(
            "Acting-user enforcement is set to `bypass`: manage-resources callers may act on \
             any post regardless of the asserted user. Do NOT use this setting in production."
        );
    }

    info!(
        required_scopes = ?cfg.required_scopes,
        create_limit = cfg.create_rate_limit.limit,
        create_window_secs = cfg.create_rate_limit.window_secs,
        "Initializing authz_resolver"
    );

    Ok(Arc::new(AuthorizationPipeline::new(authn, rate_limiter, cfg)))
}
