use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the presented token was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    /// Personal access token issued to an end user.
    User,
    /// Client-credentials token issued to a machine client. Carries no user session.
    Client,
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Client => f.write_str("client"),
        }
    }
}

/// `Principal` is the identity behind a validated bearer token.
///
/// Built once by the `AuthN` resolver and passed explicitly through scope,
/// rate-limit and ownership checks. Immutable for the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User id for personal tokens, client id for client-credentials tokens.
    id: Uuid,
    kind: PrincipalKind,
    /// Scopes exactly as granted at issuance.
    #[serde(default)]
    scopes: BTreeSet<String>,
}

impl Principal {
    #[must_use]
    pub fn builder() -> PrincipalBuilder {
        PrincipalBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> PrincipalKind {
        self.kind
    }

    #[must_use]
    pub fn is_client(&self) -> bool {
        self.kind == PrincipalKind::Client
    }

    #[must_use]
    pub fn scopes(&self) -> &BTreeSet<String> {
        &self.scopes
    }

    /// Exact-match scope check.
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }
}

#[derive(Default)]
pub struct PrincipalBuilder {
    id: Option<Uuid>,
    kind: Option<PrincipalKind>,
    scopes: BTreeSet<String>,
}

impl PrincipalBuilder {
    #[must_use]
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: PrincipalKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes.insert(scope.into());
        self
    }

    /// Missing kind defaults to `User`; missing id to the nil UUID.
    #[must_use]
    pub fn build(self) -> Principal {
        Principal {
            id: self.id.unwrap_or_default(),
            kind: self.kind.unwrap_or(PrincipalKind::User),
            scopes: self.scopes,
        }
    }
}
