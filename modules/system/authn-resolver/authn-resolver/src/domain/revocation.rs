//! In-memory revocation list.

use async_trait::async_trait;
use authn_resolver_sdk::{AuthNResolverError, TokenRevocationStore};
use dashmap::DashSet;

/// Revoked token identifiers held in memory.
///
/// Suitable for a single process; a shared deployment plugs in its own
/// [`TokenRevocationStore`] backed by the token issuer's storage.
#[derive(Debug, Default)]
pub struct InMemoryRevocationList {
    revoked: DashSet<String>,
}

impl InMemoryRevocationList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A list with `token_ids` already revoked.
    #[must_use]
    pub fn with_revoked<I, S>(token_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            revoked: token_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn revoke(&self, token_id: impl Into<String>) {
        self.revoked.insert(token_id.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}

#[async_trait]
impl TokenRevocationStore for InMemoryRevocationList {
    async fn is_revoked(&self, token_id: &str) -> Result<bool, AuthNResolverError> {
        Ok(self.revoked.contains(token_id))
    }
}
