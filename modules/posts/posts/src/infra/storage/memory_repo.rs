use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use posts_sdk::{Post, PostPatch};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repo::PostsRepository;

/// Process-local post storage.
#[derive(Default)]
pub struct InMemoryPostsRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostsRepository for InMemoryPostsRepository {
    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<Post>, DomainError> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .values()
            .filter(|p| owner_id.is_none_or(|owner| p.owner_id == owner))
            .cloned()
            .collect();
        posts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(posts)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        Ok(self.posts.read().get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, DomainError> {
        let mut posts = self.posts.write();
        if posts.contains_key(&post.id) {
            return Err(DomainError::storage(format!("duplicate post id {}", post.id)));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &PostPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.write();
        Ok(posts.get_mut(&id).map(|post| {
            if patch.apply_to(post) {
                post.updated_at = now;
            }
            post.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self.posts.write().remove(&id).is_some())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use chrono::Duration;

    fn post(owner_id: Uuid, title: &str, created_at: DateTime<Utc>) -> Post {
        Post {
            id: Uuid::new_v4(),
            owner_id,
            title: title.to_owned(),
            content: "body".to_owned(),
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn list_filters_by_owner_and_orders_by_creation() {
        let repo = InMemoryPostsRepository::new();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        let t0 = Utc::now();

        repo.insert(post(u1, "second", t0 + Duration::seconds(1)))
            .await
            .unwrap();
        repo.insert(post(u1, "first", t0)).await.unwrap();
        repo.insert(post(u2, "other", t0)).await.unwrap();

        let mine: Vec<_> = repo
            .list(Some(u1))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(mine, ["first", "second"]);
        assert_eq!(repo.list(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_touches_timestamp_only_on_change() {
        let repo = InMemoryPostsRepository::new();
        let t0 = Utc::now() - Duration::minutes(5);
        let created = repo.insert(post(Uuid::new_v4(), "t", t0)).await.unwrap();
        let now = Utc::now();

        let same = PostPatch {
            title: Some("t".to_owned()),
            content: None,
        };
        let unchanged = repo.update(created.id, &same, now).await.unwrap().unwrap();
        assert_eq!(unchanged.updated_at, t0);

        let changed = PostPatch {
            title: Some("new".to_owned()),
            content: None,
        };
        let updated = repo
            .update(created.id, &changed, now)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.updated_at, now);
    }

    #[tokio::test]
    async fn missing_posts() {
        let repo = InMemoryPostsRepository::new();
        let id = Uuid::new_v4();

        assert!(repo.find(id).await.unwrap().is_none());
        assert!(
            repo.update(id, &PostPatch::default(), Utc::now())
                .await
                .unwrap()
                .is_none()
        );
        assert!(!repo.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_storage_error() {
        let repo = InMemoryPostsRepository::new();
        let p = post(Uuid::new_v4(), "t", Utc::now());
        repo.insert(p.clone()).await.unwrap();

        assert!(matches!(
            repo.insert(p).await,
            Err(DomainError::Storage(_))
        ));
    }
}
