//! Tests for the posts service.
//!
//! The `AuthZ` resolver is mocked so these tests cover how the service acts on
//! each decision; the pipeline itself is covered in the resolver crate and in
//! the REST integration tests.

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use authz_resolver_sdk::{
        AccessMode, ActingUser, AuthDecision, AuthZResolverClient, AuthZResolverError,
        AuthorizationRequest, AuthorizedRequest, Denial, DenyReason, Operation,
        ResourceOwnerLookup,
    };
    use parking_lot::Mutex;
    use posts_sdk::{NewPost, PostPatch, PostsError};
    use postgate_security::Principal;
    use uuid::Uuid;

    use crate::domain::error::DomainError;
    use crate::domain::repo::PostsRepository;
    use crate::domain::service::{Caller, Service, ServiceConfig};
    use crate::infra::storage::memory_repo::InMemoryPostsRepository;

    /// Allows or denies every request the same way, and records the
    /// operations it was asked about. Point operations consult the lookup
    /// like the real pipeline does.
    struct MockAuthZResolver {
        outcome: Result<AuthorizedRequest, Denial>,
        seen: Mutex<Vec<Operation>>,
    }

    impl MockAuthZResolver {
        fn allow(access_mode: AccessMode, acting_user: ActingUser) -> Self {
            Self {
                outcome: Ok(AuthorizedRequest {
                    principal: Principal::builder().id(Uuid::new_v4()).build(),
                    access_mode,
                    acting_user,
                }),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn deny(denial: Denial) -> Self {
            Self {
                outcome: Err(denial),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AuthZResolverClient for MockAuthZResolver {
        async fn authorize(
            &self,
            request: &AuthorizationRequest<'_>,
            lookup: &dyn ResourceOwnerLookup,
        ) -> Result<AuthDecision, AuthZResolverError> {
            self.seen.lock().push(request.operation);
            if let Some(id) = request.resource_id
                && lookup.owner_of(id).await?.is_none()
            {
                return Err(AuthZResolverError::NotFound(id));
            }
            Ok(match &self.outcome {
                Ok(ctx) => AuthDecision::Allowed(ctx.clone()),
                Err(denial) => AuthDecision::Denied(denial.clone()),
            })
        }
    }

    struct BrokenRepository;

    #[async_trait]
    impl PostsRepository for BrokenRepository {
        async fn list(&self, _: Option<Uuid>) -> Result<Vec<posts_sdk::Post>, DomainError> {
            Err(DomainError::storage("connection reset"))
        }
        async fn find(&self, _: Uuid) -> Result<Option<posts_sdk::Post>, DomainError> {
            Err(DomainError::storage("connection reset"))
        }
        async fn insert(&self, _: posts_sdk::Post) -> Result<posts_sdk::Post, DomainError> {
            Err(DomainError::storage("connection reset"))
        }
        async fn update(
            &self,
            _: Uuid,
            _: &PostPatch,
            _: chrono::DateTime<chrono::Utc>,
        ) -> Result<Option<posts_sdk::Post>, DomainError> {
            Err(DomainError::storage("connection reset"))
        }
        async fn delete(&self, _: Uuid) -> Result<bool, DomainError> {
            Err(DomainError::storage("connection reset"))
        }
    }

    fn service<R: PostsRepository>(repo: Arc<R>, authz: MockAuthZResolver) -> Service<R> {
        Service::new(repo, Arc::new(authz), ServiceConfig::default())
    }

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.to_owned(),
            content: "content".to_owned(),
        }
    }

    async fn seed(repo: &Arc<InMemoryPostsRepository>, owner: Uuid, title: &str) -> Uuid {
        let svc = service(
            Arc::clone(repo),
            MockAuthZResolver::allow(AccessMode::SelfService, ActingUser::Token(owner)),
        );
        svc.create_post(&Caller::default(), new_post(title))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn create_assigns_acting_user_as_owner() {
        let repo = Arc::new(InMemoryPostsRepository::new());
        let acting = Uuid::new_v4();
        let svc = service(
            Arc::clone(&repo),
            MockAuthZResolver::allow(AccessMode::AllResources, ActingUser::Asserted(acting)),
        );

        let post = svc
            .create_post(&Caller::default(), new_post("Hello"))
            .await
            .unwrap();

        assert_eq!(post.owner_id, acting);
        assert_eq!(post.created_at, post.updated_at);
        assert!(repo.find(post.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn create_without_acting_user_is_forbidden() {
        let svc = service(
            Arc::new(InMemoryPostsRepository::new()),
            MockAuthZResolver::allow(AccessMode::AllResources, ActingUser::Unresolved),
        );

        let err = svc
            .create_post(&Caller::default(), new_post("Hello"))
            .await
            .unwrap_err();
        assert_eq!(PostsError::from(err), PostsError::Forbidden);
    }

    #[tokio::test]
    async fn create_validates_fields() {
        let svc = service(
            Arc::new(InMemoryPostsRepository::new()),
            MockAuthZResolver::allow(AccessMode::SelfService, ActingUser::Token(Uuid::new_v4())),
        );

        let blank = svc
            .create_post(&Caller::default(), new_post("   "))
            .await
            .unwrap_err();
        assert!(matches!(blank, DomainError::Validation { ref field, .. } if field == "title"));

        let too_long = svc
            .create_post(&Caller::default(), new_post(&"x".repeat(256)))
            .await
            .unwrap_err();
        assert!(matches!(too_long, DomainError::Validation { .. }));

        let no_content = svc
            .create_post(
                &Caller::default(),
                NewPost {
                    title: "t".to_owned(),
                    content: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(
            matches!(no_content, DomainError::Validation { ref field, .. } if field == "content")
        );
    }

    #[tokio::test]
    async fn denial_is_passed_through_without_touching_storage() {
        let svc = service(
            Arc::new(BrokenRepository),
            MockAuthZResolver::deny(Denial::rate_limited(Duration::from_millis(12_500))),
        );

        let err = svc
            .create_post(&Caller::default(), new_post("Hello"))
            .await
            .unwrap_err();
        assert_eq!(
            PostsError::from(err),
            PostsError::RateLimited {
                retry_after_secs: 13
            }
        );
    }

    #[tokio::test]
    async fn list_is_scoped_by_access_mode() {
        let repo = Arc::new(InMemoryPostsRepository::new());
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        seed(&repo, u1, "a").await;
        seed(&repo, u1, "b").await;
        seed(&repo, u2, "c").await;

        let own = service(
            Arc::clone(&repo),
            MockAuthZResolver::allow(AccessMode::SelfService, ActingUser::Token(u1)),
        );
        let posts = own.list_posts(&Caller::default()).await.unwrap();
        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.owner_id == u1));

        let all = service(
            Arc::clone(&repo),
            MockAuthZResolver::allow(AccessMode::AllResources, ActingUser::Unresolved),
        );
        assert_eq!(all.list_posts(&Caller::default()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_and_delete_existing_post() {
        let repo = Arc::new(InMemoryPostsRepository::new());
        let owner = Uuid::new_v4();
        let id = seed(&repo, owner, "Original").await;
        let authz = MockAuthZResolver::allow(AccessMode::SelfService, ActingUser::Token(owner));
        let svc = service(Arc::clone(&repo), authz);

        let updated = svc
            .update_post(
                &Caller::default(),
                id,
                PostPatch {
                    title: Some("Updated Post Title".to_owned()),
                    content: Some("Updated Post Content".to_owned()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Updated Post Title");
        assert_eq!(updated.owner_id, owner);

        svc.delete_post(&Caller::default(), id).await.unwrap();
        assert!(repo.find(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn point_operations_on_missing_post_are_not_found() {
        let svc = service(
            Arc::new(InMemoryPostsRepository::new()),
            MockAuthZResolver::allow(AccessMode::AllResources, ActingUser::Unresolved),
        );
        let missing = Uuid::new_v4();

        let err = svc.get_post(&Caller::default(), missing).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(id) if id == missing));

        let err = svc
            .delete_post(&Caller::default(), missing)
            .await
            .unwrap_err();
        assert_eq!(PostsError::from(err), PostsError::not_found(missing));
    }

    #[tokio::test]
    async fn storage_failures_surface_as_persistence() {
        let svc = service(
            Arc::new(BrokenRepository),
            MockAuthZResolver::allow(
                AccessMode::AllResources,
                ActingUser::Asserted(Uuid::new_v4()),
            ),
        );

        let err = svc
            .create_post(&Caller::default(), new_post("Hello"))
            .await
            .unwrap_err();
        assert_eq!(PostsError::from(err), PostsError::Persistence);

        // The owner lookup fails first for point operations.
        let err = svc
            .delete_post(&Caller::default(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert_eq!(PostsError::from(err), PostsError::Persistence);
    }

    #[tokio::test]
    async fn operations_are_authorized_with_their_kind() {
        let repo = Arc::new(InMemoryPostsRepository::new());
        let owner = Uuid::new_v4();
        let id = seed(&repo, owner, "t").await;
        let authz = Arc::new(MockAuthZResolver::allow(
            AccessMode::SelfService,
            ActingUser::Token(owner),
        ));
        let svc = Service::new(
            Arc::clone(&repo),
            Arc::clone(&authz) as Arc<dyn AuthZResolverClient>,
            ServiceConfig::default(),
        );

        svc.list_posts(&Caller::default()).await.unwrap();
        svc.get_post(&Caller::default(), id).await.unwrap();
        svc.delete_post(&Caller::default(), id).await.unwrap();

        assert_eq!(
            *authz.seen.lock(),
            [Operation::List, Operation::View, Operation::Delete]
        );
    }

    #[test]
    fn unavailable_authz_maps_to_unavailable() {
        let err: DomainError = AuthZResolverError::ServiceUnavailable("down".to_owned()).into();
        assert_eq!(PostsError::from(err), PostsError::Unavailable);

        let denied = DomainError::Denied(Denial::new(DenyReason::InsufficientScope));
        assert_eq!(PostsError::from(denied), PostsError::InsufficientScope);
    }
}
