//! Token capability checks.
//!
//! The gate only looks at the scopes granted at issuance; it never inspects
//! resource state.

use std::collections::BTreeSet;

use postgate_security::Principal;
use serde::{Deserialize, Serialize};

use crate::models::DenyReason;

/// Scope an operation requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeRequirement {
    /// Exactly this scope.
    One(String),
    /// At least one of these scopes.
    AnyOf(BTreeSet<String>),
}

impl ScopeRequirement {
    #[must_use]
    pub fn any_of<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(scopes.into_iter().map(Into::into).collect())
    }

    /// An empty any-of set is never satisfied.
    #[must_use]
    pub fn is_satisfied_by(&self, principal: &Principal) -> bool {
        match self {
            Self::One(scope) => principal.has_scope(scope),
            Self::AnyOf(scopes) => scopes.iter().any(|s| principal.has_scope(s)),
        }
    }
}

/// Allow when the principal holds the required scope.
///
/// # Errors
///
/// `InsufficientScope` otherwise.
pub fn require_scope(
    principal: &Principal,
    requirement: &ScopeRequirement,
) -> Result<(), DenyReason> {
    if requirement.is_satisfied_by(principal) {
        Ok(())
    } else {
        Err(DenyReason::InsufficientScope)
    }
}
