#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthZ` Resolver SDK
//!
//! This crate provides the public API for the `authz_resolver` module:
//!
//! - [`AuthZResolverClient`] - Per-request authorization decision API
//! - [`ResourceOwnerLookup`] - Resource owner lookup consumed by the resolver
//! - [`AuthorizationRequest`], [`AuthDecision`] - Request/decision models
//! - [`DenyReason`] - Terminal authorization denials
//! - [`scope_gate`] - Token capability checks
//! - [`ownership`] - Acting-user resolution and ownership policy
//! - [`AuthZResolverError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authz_resolver_sdk::{AuthZResolverClient, AuthorizationRequest, Operation};
//!
//! let request = AuthorizationRequest::new(Operation::Update)
//!     .authorization(header_value)
//!     .resource_id(post_id)
//!     .acting_user_id(body.user_id);
//!
//! let decision = authz.authorize(&request, &repo).await?;
//! if let Some(denial) = decision.denial() {
//!     return Err(denial.clone().into());
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod ownership;
pub mod scope_gate;

// Re-export main types at crate root
pub use api::{AuthZResolverClient, ResourceOwnerLookup};
pub use error::AuthZResolverError;
pub use models::{
    AccessMode, Action, ActingUser, ActingUserEnforcement, AuthDecision, AuthorizationRequest,
    AuthorizedRequest, DenyReason, Denial, IdentityResolutionMode, Operation,
};
pub use ownership::{OwnershipPolicy, OwnershipSubject, resolve_acting_user};
pub use scope_gate::{ScopeRequirement, require_scope};
