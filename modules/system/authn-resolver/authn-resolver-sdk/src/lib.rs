//! `AuthN` Resolver SDK
//!
//! This crate provides the public API for the `authn_resolver` module:
//!
//! - [`TokenAuthenticator`] - Public API trait for consumers
//! - [`TokenRevocationStore`] - Read-only revocation lookup consumed by authenticators
//! - [`AuthenticationResult`] - Authentication result model
//! - [`AccessTokenClaims`] - Claim set of JWT access tokens
//! - [`AuthNResolverError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authn_resolver_sdk::{TokenAuthenticator, bearer};
//!
//! let token = bearer::extract_bearer_token(header_value)?;
//! let result = authenticator.authenticate(token).await?;
//! let principal = result.principal;
//! ```

pub mod api;
pub mod bearer;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::{TokenAuthenticator, TokenRevocationStore};
pub use error::{AuthNResolverError, TokenRejection};
pub use models::{AccessTokenClaims, AuthenticationResult};
