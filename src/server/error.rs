use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// The HTTP failure buckets clients see. Every error leaves the server as
/// `{"success": false, "error": <code>, "message": <text>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    BadRequest,
    Forbidden,
    NotFound,
    Unprocessable,
    Internal,
}

impl ApiError {
    pub fn status(self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ApiError::BadRequest => "Bad Request",
            ApiError::Forbidden => "Forbidden",
            ApiError::NotFound => "Not Found",
            ApiError::Unprocessable => "Unprocessable",
            ApiError::Internal => "Internal server error.",
        }
    }

    /// Logs what actually went wrong and keeps the bucket.
    pub fn because(self, cause: impl Display) -> Self {
        match self {
            ApiError::Internal => tracing::error!(status = %self.status(), "{cause}"),
            _ => tracing::warn!(status = %self.status(), "{cause}"),
        }
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.status().as_u16(),
            "message": self.message(),
        });
        (self.status(), Json(body)).into_response()
    }
}
