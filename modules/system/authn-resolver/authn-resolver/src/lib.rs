//! `AuthN` Resolver Module
//!
//! Validates bearer tokens and resolves them into principals.
//!
//! Two backends are selected by configuration:
//! - **`jwt`** (default): HS256-signed access tokens with expiry, optional
//!   issuer check, and revocation lookup by `jti`.
//! - **`static_tokens`**: a configured token-to-identity table for development
//!   and tests.
//!
//! The resolver is exposed as `Arc<dyn TokenAuthenticator>` built by
//! [`build_authenticator`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod wiring;

pub use wiring::{build_authenticator, build_revocation_list};
