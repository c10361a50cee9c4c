//! `AuthZ` Resolver Module
//!
//! Turns a bearer token and a target operation into a single authorization
//! decision. Checks run in a fixed order, stopping at the first denial:
//!
//! 1. authentication through the injected `TokenAuthenticator`
//! 2. scope gate
//! 3. acting-user resolution
//! 4. create rate limit (fixed window, keyed by acting user)
//! 5. list acting-user requirement in self-service mode
//! 6. owner lookup and ownership policy for view/update/delete
//!
//! The pipeline is exposed as `Arc<dyn AuthZResolverClient>` built by
//! [`build_pipeline`].
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod wiring;

pub use domain::RateLimiter;
pub use wiring::build_pipeline;
