//! Injected responses for missing or unreadable assets.

use std::sync::Arc;

use axum::{http::request::Parts, http::StatusCode, response::Response};

use crate::encoding;

/// A collaborator that answers a request the static handler gave up on.
pub type Fallback = Arc<dyn Fn(&Parts) -> Response + Send + Sync>;

/// Plain-text `404 Not Found`.
pub fn not_found() -> Fallback {
    Arc::new(|_| encoding::text(StatusCode::NOT_FOUND, "404 page not found"))
}

/// Plain-text `500 Internal Server Error`.
pub fn internal_error() -> Fallback {
    Arc::new(|_| encoding::text(StatusCode::INTERNAL_SERVER_ERROR, "500 internal server error"))
}
