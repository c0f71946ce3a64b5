use amity_core::{CoreError, ErrorClass, ValidationErrors};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn rejected(field: &str, message: String) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        ApiError::Core(CoreError::Validation(errors))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(err) => match err.class() {
                ErrorClass::NotFound => StatusCode::NOT_FOUND,
                ErrorClass::Conflict => StatusCode::CONFLICT,
                ErrorClass::BadInput => StatusCode::BAD_REQUEST,
                ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::rejected("body", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::rejected("path", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Core(CoreError::UserNotFound { id }) => json!({
                "error": "User not found",
                "userId": id,
                "message": self.to_string(),
            }),
            ApiError::Core(CoreError::FriendNotFound { user_id, friend_id })
            | ApiError::Core(CoreError::FriendshipNotFound { user_id, friend_id }) => json!({
                "error": "Friend not found",
                "userId": user_id,
                "friendId": friend_id,
                "message": self.to_string(),
            }),
            ApiError::Core(CoreError::FriendshipExists { user_id, friend_id }) => json!({
                "error": "Friendship already exists",
                "userId": user_id,
                "friendId": friend_id,
                "message": self.to_string(),
            }),
            ApiError::Core(CoreError::Validation(errors)) => json!({
                "error": "Validation failed",
                "errors": errors,
            }),
            ApiError::Core(CoreError::MessageNotFound { .. }) => json!({
                "error": self.to_string(),
            }),
            ApiError::Core(CoreError::Internal { .. }) | ApiError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                json!({ "error": "Internal server error" })
            }
        };

        (status, axum::Json(body)).into_response()
    }
}
