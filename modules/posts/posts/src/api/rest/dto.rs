use chrono::{DateTime, Utc};
use posts_sdk::{NewPost, Post, PostPatch};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// REST DTO for a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDto {
    pub id: Uuid,
    /// Owner of the post.
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            user_id: p.owner_id,
            title: p.title,
            content: p.content,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// REST DTO for post creation.
///
/// Missing fields are reported by validation rather than by the JSON extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    /// Acting user asserted by client-credentials callers.
    pub user_id: Option<Uuid>,
}

impl CreatePostRequest {
    #[must_use]
    pub fn into_parts(self) -> (NewPost, Option<Uuid>) {
        (
            NewPost {
                title: self.title,
                content: self.content,
            },
            self.user_id,
        )
    }
}

/// REST DTO for post update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Acting user asserted by client-credentials callers.
    pub user_id: Option<Uuid>,
}

impl UpdatePostRequest {
    #[must_use]
    pub fn into_parts(self) -> (PostPatch, Option<Uuid>) {
        (
            PostPatch {
                title: self.title,
                content: self.content,
            },
            self.user_id,
        )
    }
}

/// Query parameters carrying the acting user on body-less requests.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ActingUserQuery {
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// `{ "message": ..., "post": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub message: String,
    pub post: PostDto,
}

/// `{ "message": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
