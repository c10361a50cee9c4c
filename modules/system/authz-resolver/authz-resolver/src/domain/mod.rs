//! Domain layer for the `AuthZ` resolver.

pub mod error;
pub mod pipeline;
pub mod rate_limiter;

pub use error::DomainError;
pub use pipeline::AuthorizationPipeline;
pub use rate_limiter::{RateLimitOutcome, RateLimiter};
