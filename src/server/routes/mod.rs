mod categories;
mod questions;
mod quizzes;

use axum::http::{header, HeaderMap};
use axum::Json;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use super::app::BaseUrl;
use super::error::ApiError;

type ApiResponse<T> = Result<Json<T>, ApiError>;

// absolute prefix for links handed back to clients, e.g. "http://localhost:8080/"
fn url_root(headers: &HeaderMap, base_url: &BaseUrl) -> String {
    headers
        .get(header::HOST)
        .and_then(|host| host.to_str().ok())
        .map(|host| format!("http://{host}/"))
        .unwrap_or_else(|| base_url.0.clone())
}
