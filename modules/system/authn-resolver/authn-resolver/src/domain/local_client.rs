//! Local (in-process) client for the `AuthN` resolver.

use std::sync::Arc;

use async_trait::async_trait;
use authn_resolver_sdk::{AuthNResolverError, AuthenticationResult, TokenAuthenticator};

use super::{DomainError, Service};

/// Local client wrapping the service.
///
/// Handed out as `Arc<dyn TokenAuthenticator>` by [`crate::build_authenticator`].
pub struct AuthNResolverLocalClient {
    svc: Arc<Service>,
}

impl AuthNResolverLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> AuthNResolverError {
    match &e {
        DomainError::Unauthorized(rejection) => {
            tracing::debug!(operation = op, %rejection, "token rejected");
        }
        DomainError::RevocationUnavailable(_) | DomainError::Internal(_) => {
            tracing::error!(operation = op, error = ?e, "authn_resolver call failed");
        }
    }
    e.into()
}

#[async_trait]
impl TokenAuthenticator for AuthNResolverLocalClient {
    async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, AuthNResolverError> {
        self.svc
            .authenticate(bearer_token)
            .await
            .map_err(|e| log_and_convert("authenticate", e))
    }
}
