use async_trait::async_trait;
use chrono::{DateTime, Utc};
use posts_sdk::{Post, PostPatch};
use uuid::Uuid;

use super::error::DomainError;

/// Storage port for posts.
///
/// Implementations report failures as [`DomainError::Storage`]; they never
/// make authorization decisions.
#[async_trait]
pub trait PostsRepository: Send + Sync {
    /// All posts, or only those of `owner_id` when given. Oldest first.
    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<Post>, DomainError>;

    async fn find(&self, id: Uuid) -> Result<Option<Post>, DomainError>;

    async fn insert(&self, post: Post) -> Result<Post, DomainError>;

    /// `None` when the post no longer exists.
    async fn update(
        &self,
        id: Uuid,
        patch: &PostPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, DomainError>;

    /// `false` when the post no longer exists.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}
