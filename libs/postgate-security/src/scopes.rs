//! Scope identifiers granted to access tokens at issuance.

/// Self-service scope: the holder may act only on posts it owns.
pub const MANAGE_POSTS: &str = "manage-posts";

/// Service-to-service scope: the holder may act on any post.
pub const MANAGE_RESOURCES: &str = "manage-resources";

/// All scopes understood by this deployment.
pub const KNOWN_SCOPES: &[&str] = &[MANAGE_POSTS, MANAGE_RESOURCES];
