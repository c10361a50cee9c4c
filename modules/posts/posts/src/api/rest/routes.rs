use std::sync::Arc;

use axum::routing::get;
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::repo::PostsRepository;
use crate::domain::service::Service;

pub const POSTS_PATH: &str = "/api/posts";
pub const POST_PATH: &str = "/api/posts/{id}";

/// Post CRUD routes. Every route is protected by the service's
/// authorization pipeline.
#[must_use]
pub fn register_routes<R: PostsRepository + 'static>(
    router: Router,
    service: Arc<Service<R>>,
) -> Router {
    router
        .route(
            POSTS_PATH,
            get(handlers::list_posts::<R>).post(handlers::create_post::<R>),
        )
        .route(
            POST_PATH,
            get(handlers::get_post::<R>)
                .put(handlers::update_post::<R>)
                .delete(handlers::delete_post::<R>),
        )
        .layer(Extension(service))
}
