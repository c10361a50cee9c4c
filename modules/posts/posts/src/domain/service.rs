use std::sync::Arc;

use async_trait::async_trait;
use authz_resolver_sdk::{
    AccessMode, AuthZResolverClient, AuthZResolverError, AuthorizationRequest, AuthorizedRequest,
    Operation, ResourceOwnerLookup,
};
use chrono::Utc;
use posts_sdk::{NewPost, Post, PostPatch};
use uuid::Uuid;

use super::error::DomainError;
use super::repo::PostsRepository;

pub(crate) mod fields {
    pub const TITLE: &str = "title";
    pub const CONTENT: &str = "content";
}

/// Request-level inputs the authorization pipeline needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Caller<'a> {
    /// Raw `Authorization` header value.
    pub authorization: Option<&'a str>,
    /// Acting user asserted by the request (body or query `user_id`).
    pub acting_user_id: Option<Uuid>,
}

// ============================================================================
// Service Configuration
// ============================================================================

pub struct ServiceConfig {
    pub max_title_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_title_length: 255,
        }
    }
}

// ============================================================================
// Service Implementation
// ============================================================================

pub struct Service<R: PostsRepository> {
    repo: Arc<R>,
    authz: Arc<dyn AuthZResolverClient>,
    config: ServiceConfig,
}

impl<R: PostsRepository> Service<R> {
    #[must_use]
    pub fn new(
        repo: Arc<R>,
        authz: Arc<dyn AuthZResolverClient>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            repo,
            authz,
            config,
        }
    }

    /// Posts visible to the caller: all posts under `manage-resources`,
    /// otherwise only the acting user's own.
    ///
    /// # Errors
    ///
    /// Authorization denials, or `Storage` when the repository fails.
    pub async fn list_posts(&self, caller: &Caller<'_>) -> Result<Vec<Post>, DomainError> {
        let ctx = self.authorize(caller, Operation::List, None).await?;

        let owner_filter = match ctx.access_mode {
            AccessMode::AllResources => None,
            AccessMode::SelfService => {
                Some(ctx.acting_user.id().ok_or_else(DomainError::forbidden)?)
            }
        };

        self.repo.list(owner_filter).await.inspect_err(log_storage_failure("list"))
    }

    /// # Errors
    ///
    /// Authorization denials, `NotFound`, or `Storage`.
    pub async fn get_post(&self, caller: &Caller<'_>, id: Uuid) -> Result<Post, DomainError> {
        self.authorize(caller, Operation::View, Some(id)).await?;

        self.repo
            .find(id)
            .await
            .inspect_err(log_storage_failure("view"))?
            .ok_or(DomainError::NotFound(id))
    }

    /// Create a post owned by the request's acting user.
    ///
    /// # Errors
    ///
    /// Authorization denials (including `RateLimited`), `Validation`, or
    /// `Storage`.
    pub async fn create_post(
        &self,
        caller: &Caller<'_>,
        new_post: NewPost,
    ) -> Result<Post, DomainError> {
        let ctx = self.authorize(caller, Operation::Create, None).await?;
        let owner_id = ctx.acting_user.id().ok_or_else(DomainError::forbidden)?;

        self.validate_title(&new_post.title)?;
        validate_content(&new_post.content)?;

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            owner_id,
            title: new_post.title,
            content: new_post.content,
            created_at: now,
            updated_at: now,
        };

        let post = self
            .repo
            .insert(post)
            .await
            .inspect_err(log_storage_failure("create"))?;

        tracing::info!(post_id = %post.id, owner_id = %post.owner_id, "Post created");
        Ok(post)
    }

    /// # Errors
    ///
    /// Authorization denials, `NotFound`, `Validation`, or `Storage`.
    pub async fn update_post(
        &self,
        caller: &Caller<'_>,
        id: Uuid,
        patch: PostPatch,
    ) -> Result<Post, DomainError> {
        self.authorize(caller, Operation::Update, Some(id)).await?;

        if let Some(title) = &patch.title {
            self.validate_title(title)?;
        }
        if let Some(content) = &patch.content {
            validate_content(content)?;
        }

        self.repo
            .update(id, &patch, Utc::now())
            .await
            .inspect_err(log_storage_failure("update"))?
            .ok_or(DomainError::NotFound(id))
    }

    /// # Errors
    ///
    /// Authorization denials, `NotFound`, or `Storage`.
    pub async fn delete_post(&self, caller: &Caller<'_>, id: Uuid) -> Result<(), DomainError> {
        self.authorize(caller, Operation::Delete, Some(id)).await?;

        let deleted = self
            .repo
            .delete(id)
            .await
            .inspect_err(log_storage_failure("delete"))?;
        if !deleted {
            return Err(DomainError::NotFound(id));
        }

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    async fn authorize(
        &self,
        caller: &Caller<'_>,
        operation: Operation,
        resource_id: Option<Uuid>,
    ) -> Result<AuthorizedRequest, DomainError> {
        let mut request = AuthorizationRequest::new(operation)
            .authorization(caller.authorization)
            .acting_user_id(caller.acting_user_id);
        if let Some(id) = resource_id {
            request = request.resource_id(id);
        }

        let owners = RepoOwners(Arc::clone(&self.repo));
        let decision = self.authz.authorize(&request, &owners).await?;
        decision.into_result().map_err(DomainError::Denied)
    }

    fn validate_title(&self, title: &str) -> Result<(), DomainError> {
        if title.trim().is_empty() {
            return Err(DomainError::validation(fields::TITLE, "is required"));
        }
        if title.chars().count() > self.config.max_title_length {
            return Err(DomainError::validation(
                fields::TITLE,
                format!("exceeds maximum length of {}", self.config.max_title_length),
            ));
        }
        Ok(())
    }
}

fn validate_content(content: &str) -> Result<(), DomainError> {
    if content.trim().is_empty() {
        return Err(DomainError::validation(fields::CONTENT, "is required"));
    }
    Ok(())
}

fn log_storage_failure(operation: &'static str) -> impl Fn(&DomainError) {
    move |e| {
        if let DomainError::Storage(msg) = e {
            tracing::error!(operation, error = %msg, "Post storage operation failed");
        }
    }
}

/// Owner lookup over the repository, handed to the authorization pipeline.
struct RepoOwners<R>(Arc<R>);

#[async_trait]
impl<R: PostsRepository> ResourceOwnerLookup for RepoOwners<R> {
    async fn owner_of(&self, resource_id: Uuid) -> Result<Option<Uuid>, AuthZResolverError> {
        match self.0.find(resource_id).await {
            Ok(post) => Ok(post.map(|p| p.owner_id)),
            Err(e) => {
                tracing::error!(post_id = %resource_id, error = %e, "Post owner lookup failed");
                Err(AuthZResolverError::Persistence(e.to_string()))
            }
        }
    }
}
