//! Acting-user resolution and the ownership policy.
//!
//! Both functions are pure: they see the principal, the request's asserted
//! user id and the resource owner, and nothing else.

use postgate_security::Principal;
use uuid::Uuid;

use crate::models::{
    AccessMode, Action, ActingUser, ActingUserEnforcement, DenyReason, IdentityResolutionMode,
};

/// Resolve the acting user of a request.
///
/// A client principal never acts as itself: it either asserts a user id
/// (`FromExplicitField`) or has no acting user.
///
/// # Errors
///
/// `Forbidden` when a user principal asserts an id other than its own.
pub fn resolve_acting_user(
    principal: &Principal,
    mode: IdentityResolutionMode,
    asserted: Option<Uuid>,
) -> Result<ActingUser, DenyReason> {
    if !principal.is_client() {
        return match asserted {
            Some(id) if id != principal.id() => Err(DenyReason::Forbidden),
            _ => Ok(ActingUser::Token(principal.id())),
        };
    }

    Ok(match (mode, asserted) {
        (IdentityResolutionMode::FromExplicitField, Some(id)) => ActingUser::Asserted(id),
        _ => ActingUser::Unresolved,
    })
}

/// Who is asking, and with what breadth.
#[derive(Debug, Clone, Copy)]
pub struct OwnershipSubject<'a> {
    pub principal: &'a Principal,
    pub acting_user: ActingUser,
    pub access_mode: AccessMode,
}

/// Ownership decision for view/update/delete.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipPolicy {
    enforcement: ActingUserEnforcement,
}

impl OwnershipPolicy {
    #[must_use]
    pub fn new(enforcement: ActingUserEnforcement) -> Self {
        Self { enforcement }
    }

    /// Decide whether `subject` may perform `action` on a resource owned by
    /// `owner_id`. The decision does not depend on `action`.
    ///
    /// # Errors
    ///
    /// `Forbidden` when the acting user does not own the resource.
    pub fn authorize(
        &self,
        _action: Action,
        subject: &OwnershipSubject<'_>,
        owner_id: Uuid,
    ) -> Result<(), DenyReason> {
        let owns = subject.acting_user.id() == Some(owner_id);

        let allowed = match subject.access_mode {
            AccessMode::SelfService => owns,
            AccessMode::AllResources => {
                !(subject.acting_user.is_asserted()
                    && self.enforcement == ActingUserEnforcement::Enforce)
                    || owns
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(DenyReason::Forbidden)
        }
    }
}
