//! Domain layer for the `AuthN` resolver.

pub mod error;
pub mod jwt;
pub mod local_client;
pub mod revocation;
pub mod service;
pub mod static_tokens;

pub use error::DomainError;
pub use jwt::JwtAuthenticator;
pub use local_client::AuthNResolverLocalClient;
pub use revocation::InMemoryRevocationList;
pub use service::Service;
pub use static_tokens::StaticTokenAuthenticator;
