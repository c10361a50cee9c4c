use std::sync::Arc;

use authz_resolver_sdk::AuthZResolverClient;
use axum::Router;
use tracing::info;

use crate::api::rest::routes;
use crate::config::PostsConfig;
use crate::domain::repo::PostsRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::infra::storage::memory_repo::InMemoryPostsRepository;

/// Build the posts REST router over the in-memory repository.
#[must_use]
pub fn build_router(cfg: &PostsConfig, authz: Arc<dyn AuthZResolverClient>) -> Router {
    build_router_with_repo(cfg, authz, Arc::new(InMemoryPostsRepository::new()))
}

/// Build the posts REST router over a caller-supplied repository.
#[must_use]
pub fn build_router_with_repo<R: PostsRepository + 'static>(
    cfg: &PostsConfig,
    authz: Arc<dyn AuthZResolverClient>,
    repo: Arc<R>,
) -> Router {
    info!(max_title_length = cfg.max_title_length, "Initializing posts module");

    let service_config = ServiceConfig {
        max_title_length: cfg.max_title_length,
    };
    let service = Arc::new(Service::new(repo, authz, service_config));

    routes::register_routes(Router::new(), service)
}
