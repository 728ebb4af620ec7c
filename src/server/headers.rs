//! Caching headers for image responses.
//!
//! Image and thumbnail bodies carry a strong `ETag` derived from their bytes
//! and a `Cache-Control: public, max-age=N` header. A request whose
//! `If-None-Match` lists the current tag gets `304 Not Modified` and no body.

use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};

/// Strong entity tag for `bytes`: quoted, first 128 bits of SHA-256 as hex.
pub fn etag_for(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let hex = format!("{:x}", digest);
    format!("\"{}\"", &hex[..32])
}

/// Whether an `If-None-Match` header matches `etag`.
///
/// Handles `*`, comma-separated lists, and weak (`W/`) validators.
pub fn if_none_match(request: &HeaderMap, etag: &str) -> bool {
    request
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
}

/// Build a cacheable response for an image body.
pub fn cached_response(
    request: &HeaderMap,
    body: Vec<u8>,
    content_type: &'static str,
    max_age: u64,
) -> Response {
    let etag = etag_for(&body);
    let cache_control = format!("public, max-age={max_age}");

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&etag) {
        headers.insert(header::ETAG, value);
    }
    if let Ok(value) = HeaderValue::from_str(&cache_control) {
        headers.insert(header::CACHE_CONTROL, value);
    }

    if if_none_match(request, &etag) {
        return (StatusCode::NOT_MODIFIED, headers).into_response();
    }

    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    (StatusCode::OK, headers, Body::from(body)).into_response()
}
