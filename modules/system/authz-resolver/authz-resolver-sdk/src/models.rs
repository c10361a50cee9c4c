//! Domain models for the `AuthZ` resolver module.

use std::fmt;
use std::time::Duration;

use postgate_security::Principal;
use postgate_security::scopes::MANAGE_RESOURCES;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operation on the posts resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    View,
    Update,
    Delete,
}

impl Operation {
    /// The point action for operations that target a single resource.
    #[must_use]
    pub fn action(self) -> Option<Action> {
        match self {
            Self::View => Some(Action::View),
            Self::Update => Some(Action::Update),
            Self::Delete => Some(Action::Delete),
            Self::List | Self::Create => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::View => "view",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action subject to the ownership policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    View,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::View => "view",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Breadth of access granted by the token's scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMode {
    /// Caller may act only on resources owned by its acting user.
    SelfService,
    /// Caller may act on any resource (`manage-resources`).
    AllResources,
}

impl AccessMode {
    /// `AllResources` when `manage-resources` is held, otherwise `SelfService`.
    #[must_use]
    pub fn for_principal(principal: &Principal) -> Self {
        if principal.has_scope(MANAGE_RESOURCES) {
            Self::AllResources
        } else {
            Self::SelfService
        }
    }
}

/// Where the acting user of a request comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityResolutionMode {
    /// User tokens act as themselves; client tokens have no acting user.
    #[default]
    FromToken,
    /// Client tokens act as the user id asserted in the request.
    FromExplicitField,
}

/// Whether an asserted acting-user id is checked against the owner when the
/// caller holds `manage-resources`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActingUserEnforcement {
    #[default]
    Enforce,
    Bypass,
}

/// The user a request acts on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActingUser {
    /// The token's own user.
    Token(Uuid),
    /// A user id asserted in the request payload by a client.
    Asserted(Uuid),
    /// No acting user could be resolved.
    Unresolved,
}

impl ActingUser {
    #[must_use]
    pub fn id(self) -> Option<Uuid> {
        match self {
            Self::Token(id) | Self::Asserted(id) => Some(id),
            Self::Unresolved => None,
        }
    }

    #[must_use]
    pub fn is_asserted(self) -> bool {
        matches!(self, Self::Asserted(_))
    }
}

/// Terminal authorization denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    Unauthenticated,
    InsufficientScope,
    Forbidden,
    RateLimited,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unauthenticated => "unauthenticated",
            Self::InsufficientScope => "insufficient_scope",
            Self::Forbidden => "forbidden",
            Self::RateLimited => "rate_limited",
        })
    }
}

/// A denial with its optional retry hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub reason: DenyReason,
    /// Time until the rate-limit window resets. Only set for `RateLimited`.
    pub retry_after: Option<Duration>,
}

impl Denial {
    #[must_use]
    pub fn new(reason: DenyReason) -> Self {
        Self {
            reason,
            retry_after: None,
        }
    }

    #[must_use]
    pub fn rate_limited(retry_after: Duration) -> Self {
        Self {
            reason: DenyReason::RateLimited,
            retry_after: Some(retry_after),
        }
    }

    /// Retry hint rounded up to whole seconds.
    #[must_use]
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.retry_after
            .map(|d| d.as_secs() + u64::from(d.subsec_nanos() > 0))
    }
}

impl From<DenyReason> for Denial {
    fn from(reason: DenyReason) -> Self {
        Self::new(reason)
    }
}

/// Input to a single authorization decision.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationRequest<'a> {
    /// Raw `Authorization` header value.
    pub authorization: Option<&'a str>,
    pub operation: Operation,
    /// Target resource for view/update/delete.
    pub resource_id: Option<Uuid>,
    /// Acting user id asserted in the request payload.
    pub acting_user_id: Option<Uuid>,
}

impl<'a> AuthorizationRequest<'a> {
    #[must_use]
    pub fn new(operation: Operation) -> Self {
        Self {
            authorization: None,
            operation,
            resource_id: None,
            acting_user_id: None,
        }
    }

    #[must_use]
    pub fn authorization(mut self, header: Option<&'a str>) -> Self {
        self.authorization = header;
        self
    }

    #[must_use]
    pub fn resource_id(mut self, id: Uuid) -> Self {
        self.resource_id = Some(id);
        self
    }

    #[must_use]
    pub fn acting_user_id(mut self, id: Option<Uuid>) -> Self {
        self.acting_user_id = id;
        self
    }
}

/// Context handed to the resource layer once a request is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedRequest {
    pub principal: Principal,
    pub access_mode: AccessMode,
    pub acting_user: ActingUser,
}

/// Terminal decision of the authorization pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed(AuthorizedRequest),
    Denied(Denial),
}

impl AuthDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Allowed(ctx) => Some(&ctx.principal),
            Self::Denied(_) => None,
        }
    }

    #[must_use]
    pub fn reason(&self) -> Option<DenyReason> {
        self.denial().map(|d| d.reason)
    }

    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        self.denial().and_then(|d| d.retry_after)
    }

    #[must_use]
    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Self::Allowed(_) => None,
            Self::Denied(denial) => Some(denial),
        }
    }

    /// Split into the allowed context or the denial.
    ///
    /// # Errors
    ///
    /// Returns the [`Denial`] when the request was denied.
    pub fn into_result(self) -> Result<AuthorizedRequest, Denial> {
        match self {
            Self::Allowed(ctx) => Ok(ctx),
            Self::Denied(denial) => Err(denial),
        }
    }
}
