//! Thin endpoint callers.
//!
//! Each function is one client call plus the caller-side work the client
//! deliberately skips: rejecting non-2xx statuses and decoding the body.

pub mod auth;
pub mod catalog;
pub mod comments;
pub mod playlists;
pub mod posts;
pub mod users;

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::HttpResponse;

pub(crate) fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    response.error_for_status()?.json()
}

pub(crate) fn expect_success(response: HttpResponse) -> Result<(), ApiError> {
    response.error_for_status().map(|_| ())
}

/// Body for action endpoints that take no input.
pub(crate) fn empty_body() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Append a page request to a path that has no query yet.
pub(crate) fn paged(path: &str, page: crate::types::PageRequest) -> String {
    format!("{path}?{}", page.query())
}
