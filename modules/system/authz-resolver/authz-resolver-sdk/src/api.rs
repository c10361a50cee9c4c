//! Public API traits for the `AuthZ` resolver.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AuthZResolverError;
use crate::models::{AuthDecision, AuthorizationRequest};

/// Per-request authorization decision point.
///
/// Runs authentication, scope, rate-limit and ownership checks in that order
/// and returns a terminal decision. The resource-handling layer performs the
/// storage operation afterwards.
#[async_trait]
pub trait AuthZResolverClient: Send + Sync {
    /// Decide whether the request may proceed.
    ///
    /// `lookup` is only consulted for point operations (view/update/delete),
    /// and only after the caller has been authenticated and scope-checked.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the target resource does not exist
    /// - `Persistence` if the owner lookup fails
    /// - `ServiceUnavailable` / `Internal` for infrastructure failures
    async fn authorize(
        &self,
        request: &AuthorizationRequest<'_>,
        lookup: &dyn ResourceOwnerLookup,
    ) -> Result<AuthDecision, AuthZResolverError>;
}

/// Read-only resource owner lookup, provided by the resource module.
#[async_trait]
pub trait ResourceOwnerLookup: Send + Sync {
    /// Owner of the resource, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// `Persistence` when the storage layer fails.
    async fn owner_of(&self, resource_id: Uuid) -> Result<Option<Uuid>, AuthZResolverError>;
}
