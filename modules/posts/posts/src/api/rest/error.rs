use authz_resolver_sdk::Operation;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode, header};
use posts_sdk::PostsError;

use super::dto::MessageResponse;

/// Error response with a `{ "message": ... }` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Seconds for the `Retry-After` header.
    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            retry_after_secs: None,
        }
    }
}

/// Fixed message for storage failures of `operation`.
#[must_use]
pub fn failure_message(operation: Operation) -> &'static str {
    match operation {
        Operation::Create => "Post creation failed",
        Operation::Update => "Post update failed",
        Operation::Delete => "Post deletion failed",
        Operation::List | Operation::View => "Post retrieval failed",
    }
}

/// Convert posts errors to HTTP responses.
#[must_use]
pub fn posts_error_to_api(operation: Operation, err: PostsError) -> ApiError {
    match err {
        PostsError::Unauthenticated => ApiError::new(StatusCode::UNAUTHORIZED, "Unauthenticated."),
        PostsError::InsufficientScope => {
            ApiError::new(StatusCode::FORBIDDEN, "Invalid scope(s) provided.")
        }
        PostsError::Forbidden => {
            ApiError::new(StatusCode::FORBIDDEN, "This action is unauthorized.")
        }
        PostsError::RateLimited { retry_after_secs } => ApiError {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: format!("Too many attempts. Please try again in {retry_after_secs} seconds."),
            retry_after_secs: Some(retry_after_secs),
        },
        PostsError::NotFound { .. } => ApiError::new(StatusCode::NOT_FOUND, "Post not found."),
        PostsError::Validation { field, message } => ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("The {field} field {message}."),
        ),
        PostsError::Persistence => {
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, failure_message(operation))
        }
        PostsError::Unavailable => {
            ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable.")
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            Json(MessageResponse {
                message: self.message,
            }),
        )
            .into_response();
        if let Some(secs) = self.retry_after_secs {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}
