use std::sync::Arc;

use authz_resolver_sdk::Operation;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Extension, Json, Path, Query};
use axum::http::{HeaderMap, StatusCode, header};
use tracing::field::Empty;
use uuid::Uuid;

use crate::api::rest::dto::{
    ActingUserQuery, CreatePostRequest, MessageResponse, PostDto, PostMessageResponse,
    UpdatePostRequest,
};
use crate::api::rest::error::{ApiError, posts_error_to_api};
use crate::domain::error::DomainError;
use crate::domain::repo::PostsRepository;
use crate::domain::service::{Caller, Service};

type ApiResult<T> = Result<T, ApiError>;

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

fn to_api(operation: Operation) -> impl FnOnce(DomainError) -> ApiError {
    move |e| posts_error_to_api(operation, e.into())
}

/// List posts visible to the caller.
#[tracing::instrument(skip_all, fields(acting_user_id = Empty))]
pub async fn list_posts<R: PostsRepository + 'static>(
    Extension(svc): Extension<Arc<Service<R>>>,
    headers: HeaderMap,
    query: Result<Query<ActingUserQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PostDto>>> {
    let Query(query) = query?;
    record_acting_user(query.user_id);

    let caller = Caller {
        authorization: authorization(&headers),
        acting_user_id: query.user_id,
    };
    let posts = svc
        .list_posts(&caller)
        .await
        .map_err(to_api(Operation::List))?;

    Ok(Json(posts.into_iter().map(PostDto::from).collect()))
}

/// Create a post owned by the acting user.
#[tracing::instrument(skip_all, fields(acting_user_id = Empty))]
pub async fn create_post<R: PostsRepository + 'static>(
    Extension(svc): Extension<Arc<Service<R>>>,
    headers: HeaderMap,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PostMessageResponse>)> {
    let Json(body) = body?;
    let (new_post, acting_user_id) = body.into_parts();
    record_acting_user(acting_user_id);

    let caller = Caller {
        authorization: authorization(&headers),
        acting_user_id,
    };
    let post = svc
        .create_post(&caller, new_post)
        .await
        .map_err(to_api(Operation::Create))?;

    Ok((
        StatusCode::CREATED,
        Json(PostMessageResponse {
            message: "Post created successfully".to_owned(),
            post: post.into(),
        }),
    ))
}

/// Show one post.
#[tracing::instrument(skip_all, fields(post_id = Empty, acting_user_id = Empty))]
pub async fn get_post<R: PostsRepository + 'static>(
    Extension(svc): Extension<Arc<Service<R>>>,
    headers: HeaderMap,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<ActingUserQuery>, QueryRejection>,
) -> ApiResult<Json<PostDto>> {
    let Path(id) = id?;
    let Query(query) = query?;
    record_post(id);
    record_acting_user(query.user_id);

    let caller = Caller {
        authorization: authorization(&headers),
        acting_user_id: query.user_id,
    };
    let post = svc
        .get_post(&caller, id)
        .await
        .map_err(to_api(Operation::View))?;

    Ok(Json(post.into()))
}

/// Update a post.
#[tracing::instrument(skip_all, fields(post_id = Empty, acting_user_id = Empty))]
pub async fn update_post<R: PostsRepository + 'static>(
    Extension(svc): Extension<Arc<Service<R>>>,
    headers: HeaderMap,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> ApiResult<Json<PostMessageResponse>> {
    let Path(id) = id?;
    let Json(body) = body?;
    let (patch, acting_user_id) = body.into_parts();
    record_post(id);
    record_acting_user(acting_user_id);

    let caller = Caller {
        authorization: authorization(&headers),
        acting_user_id,
    };
    let post = svc
        .update_post(&caller, id, patch)
        .await
        .map_err(to_api(Operation::Update))?;

    Ok(Json(PostMessageResponse {
        message: "Post updated successfully".to_owned(),
        post: post.into(),
    }))
}

/// Delete a post.
#[tracing::instrument(skip_all, fields(post_id = Empty, acting_user_id = Empty))]
pub async fn delete_post<R: PostsRepository + 'static>(
    Extension(svc): Extension<Arc<Service<R>>>,
    headers: HeaderMap,
    id: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<ActingUserQuery>, QueryRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    let Query(query) = query?;
    record_post(id);
    record_acting_user(query.user_id);

    let caller = Caller {
        authorization: authorization(&headers),
        acting_user_id: query.user_id,
    };
    svc.delete_post(&caller, id)
        .await
        .map_err(to_api(Operation::Delete))?;

    Ok(Json(MessageResponse {
        message: "Post deleted successfully".to_owned(),
    }))
}

fn record_post(id: Uuid) {
    tracing::Span::current().record("post_id", tracing::field::display(id));
}

fn record_acting_user(id: Option<Uuid>) {
    if let Some(id) = id {
        tracing::Span::current().record("acting_user_id", tracing::field::display(id));
    }
}
