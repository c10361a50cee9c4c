//! Domain service for the `AuthN` resolver.

use authn_resolver_sdk::AuthenticationResult;

use super::error::DomainError;
use super::jwt::JwtAuthenticator;
use super::static_tokens::StaticTokenAuthenticator;

enum Backend {
    Jwt(JwtAuthenticator),
    Static(StaticTokenAuthenticator),
}

/// `AuthN` resolver service.
///
/// Routes authentication to the backend selected by configuration.
pub struct Service {
    backend: Backend,
}

impl Service {
    #[must_use]
    pub fn jwt(authenticator: JwtAuthenticator) -> Self {
        Self {
            backend: Backend::Jwt(authenticator),
        }
    }

    #[must_use]
    pub fn static_tokens(authenticator: StaticTokenAuthenticator) -> Self {
        Self {
            backend: Backend::Static(authenticator),
        }
    }

    /// Authenticate a bearer token via the configured backend.
    ///
    /// # Errors
    ///
    /// Propagates backend rejections and revocation lookup failures.
    #[tracing::instrument(skip_all, fields(principal_id, principal_kind))]
    pub async fn authenticate(
        &self,
        bearer_token: &str,
    ) -> Result<AuthenticationResult, DomainError> {
        let result = match &self.backend {
            Backend::Jwt(jwt) => jwt.authenticate(bearer_token).await,
            Backend::Static(table) => table.authenticate(bearer_token),
        }?;

        let span = tracing::Span::current();
        span.record("principal_id", tracing::field::display(result.principal.id()));
        span.record(
            "principal_kind",
            tracing::field::display(result.principal.kind()),
        );
        Ok(result)
    }
}
