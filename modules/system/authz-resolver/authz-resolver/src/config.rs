//! Configuration for the `AuthZ` resolver.

use std::time::Duration;

use authz_resolver_sdk::{
    AccessMode, ActingUserEnforcement, IdentityResolutionMode, ScopeRequirement,
};
use postgate_security::scopes::{MANAGE_POSTS, MANAGE_RESOURCES};
use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthZResolverConfig {
    /// Scopes accepted for post operations. Holding any one is enough.
    pub required_scopes: Vec<String>,

    /// Acting-user resolution per access mode.
    pub identity_resolution: IdentityResolutionConfig,

    /// Check asserted acting users against the owner under `manage-resources`.
    pub acting_user_enforcement: ActingUserEnforcement,

    /// Budget for create operations.
    pub create_rate_limit: RateLimitConfig,
}

impl Default for AuthZResolverConfig {
    fn default() -> Self {
        Self {
            required_scopes: vec![MANAGE_POSTS.to_owned(), MANAGE_RESOURCES.to_owned()],
            identity_resolution: IdentityResolutionConfig::default(),
            acting_user_enforcement: ActingUserEnforcement::Enforce,
            create_rate_limit: RateLimitConfig::default(),
        }
    }
}

impl AuthZResolverConfig {
    #[must_use]
    pub fn scope_requirement(&self) -> ScopeRequirement {
        match self.required_scopes.as_slice() {
            [single] => ScopeRequirement::One(single.clone()),
            many => ScopeRequirement::any_of(many.iter().cloned()),
        }
    }
}

/// Identity resolution mode keyed by the scope that grants access.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentityResolutionConfig {
    /// Applies to `manage-posts` (self-service) callers.
    pub manage_posts: IdentityResolutionMode,
    /// Applies to `manage-resources` (all-resources) callers.
    pub manage_resources: IdentityResolutionMode,
}

impl Default for IdentityResolutionConfig {
    fn default() -> Self {
        Self {
            manage_posts: IdentityResolutionMode::FromToken,
            manage_resources: IdentityResolutionMode::FromExplicitField,
        }
    }
}

impl IdentityResolutionConfig {
    #[must_use]
    pub fn for_access_mode(&self, mode: AccessMode) -> IdentityResolutionMode {
        match mode {
            AccessMode::SelfService => self.manage_posts,
            AccessMode::AllResources => self.manage_resources,
        }
    }
}

/// Longest accepted rate-limit window, in seconds.
pub const MAX_WINDOW_SECS: u64 = 24 * 60 * 60;

/// Fixed-window rate limit settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Attempts allowed per window.
    pub limit: u32,
    /// Window length, in seconds. Must be in `1..=MAX_WINDOW_SECS`.
    pub window_secs: u64,
    /// How often expired windows are purged, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            window_secs: 60,
            sweep_interval_secs: 60,
        }
    }
}

impl RateLimitConfig {
    #[must_use]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}
