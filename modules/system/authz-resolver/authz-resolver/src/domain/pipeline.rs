//! Per-request authorization pipeline.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use authn_resolver_sdk::TokenAuthenticator;
use authn_resolver_sdk::bearer::extract_bearer_token;
use authz_resolver_sdk::{
    AccessMode, ActingUser, AuthDecision, AuthZResolverClient, AuthZResolverError,
    AuthorizationRequest, AuthorizedRequest, Denial, DenyReason, Operation, OwnershipPolicy,
    OwnershipSubject, ResourceOwnerLookup, ScopeRequirement, require_scope,
    resolve_acting_user,
};
use postgate_security::Principal;
use uuid::Uuid;

use super::error::DomainError;
use super::rate_limiter::{RateLimitOutcome, RateLimiter};
use crate::config::{AuthZResolverConfig, IdentityResolutionConfig};

/// Rate-limit key namespace for create operations.
pub const CREATE_RATE_KEY_PREFIX: &str = "create-resource";

#[must_use]
pub fn create_rate_key(acting_user_id: Uuid) -> String {
    format!("{CREATE_RATE_KEY_PREFIX}|{acting_user_id}")
}

/// Runs authentication, scope, rate-limit and ownership checks and returns a
/// terminal decision.
///
/// Owns no per-request state. The only shared mutable state is the injected
/// [`RateLimiter`].
pub struct AuthorizationPipeline {
    authn: Arc<dyn TokenAuthenticator>,
    rate_limiter: Arc<RateLimiter>,
    ownership: OwnershipPolicy,
    required_scopes: ScopeRequirement,
    identity_resolution: IdentityResolutionConfig,
    create_limit: u32,
    create_window: Duration,
}

impl AuthorizationPipeline {
    #[must_use]
    pub fn new(
        authn: Arc<dyn TokenAuthenticator>,
        rate_limiter: Arc<RateLimiter>,
        cfg: &AuthZResolverConfig,
    ) -> Self {
        Self {
            authn,
            rate_limiter,
            ownership: OwnershipPolicy::new(cfg.acting_user_enforcement),
            required_scopes: cfg.scope_requirement(),
            identity_resolution: cfg.identity_resolution,
            create_limit: cfg.create_rate_limit.limit,
            create_window: cfg.create_rate_limit.window(),
        }
    }

    async fn evaluate(
        &self,
        request: &AuthorizationRequest<'_>,
        lookup: &dyn ResourceOwnerLookup,
    ) -> Result<AuthorizedRequest, DomainError> {
        let principal = self.authenticate(request.authorization).await?;

        require_scope(&principal, &self.required_scopes)?;

        let access_mode = AccessMode::for_principal(&principal);
        let acting_user = resolve_acting_user(
            &principal,
            self.identity_resolution.for_access_mode(access_mode),
            request.acting_user_id,
        )?;

        match request.operation {
            Operation::Create => self.check_create_budget(acting_user)?,
            Operation::List => {
                if access_mode == AccessMode::SelfService && acting_user.id().is_none() {
                    return Err(DenyReason::Forbidden.into());
                }
            }
            Operation::View | Operation::Update | Operation::Delete => {
                let (Some(action), Some(resource_id)) =
                    (request.operation.action(), request.resource_id)
                else {
                    return Err(DenyReason::Forbidden.into());
                };

                let owner_id = lookup
                    .owner_of(resource_id)
                    .await?
                    .ok_or(DomainError::NotFound(resource_id))?;

                let subject = OwnershipSubject {
                    principal: &principal,
                    acting_user,
                    access_mode,
                };
                self.ownership.authorize(action, &subject, owner_id)?;
            }
        }

        Ok(AuthorizedRequest {
            principal,
            access_mode,
            acting_user,
        })
    }

    async fn authenticate(&self, header: Option<&str>) -> Result<Principal, DomainError> {
        let token = extract_bearer_token(header)?;
        Ok(self.authn.authenticate(token).await?.principal)
    }

    fn check_create_budget(&self, acting_user: ActingUser) -> Result<(), DomainError> {
        let acting_user_id = acting_user.id().ok_or(DenyReason::Forbidden)?;
        match self.rate_limiter.allow(
            &create_rate_key(acting_user_id),
            self.create_limit,
            self.create_window,
        ) {
            RateLimitOutcome::Allowed { .. } => Ok(()),
            RateLimitOutcome::Denied { retry_after } => {
                Err(Denial::rate_limited(retry_after).into())
            }
        }
    }
}

#[async_trait]
impl AuthZResolverClient for AuthorizationPipeline {
    #[tracing::instrument(skip_all, fields(operation = %request.operation))]
    async fn authorize(
        &self,
        request: &AuthorizationRequest<'_>,
        lookup: &dyn ResourceOwnerLookup,
    ) -> Result<AuthDecision, AuthZResolverError> {
        match self.evaluate(request, lookup).await {
            Ok(ctx) => {
                tracing::debug!(
                    principal_id = %ctx.principal.id(),
                    principal_kind = %ctx.principal.kind(),
                    access_mode = ?ctx.access_mode,
                    "request allowed"
                );
                Ok(AuthDecision::Allowed(ctx))
            }
            Err(e) => match e.into_outcome() {
                Ok(denial) => {
                    tracing::debug!(
                        reason = %denial.reason,
                        retry_after_secs = denial.retry_after_secs(),
                        "request denied"
                    );
                    Ok(AuthDecision::Denied(denial))
                }
                Err(AuthZResolverError::NotFound(id)) => Err(AuthZResolverError::NotFound(id)),
                Err(failure) => {
                    tracing::error!(error = %failure, "authorization failed");
                    Err(failure)
                }
            },
        }
    }
}
