//! Content negotiation filters
//!
//! Pure header checks layered around handlers with
//! `middleware::from_fn_with_state(MEDIA_TYPE, accept)` /
//! `middleware::from_fn_with_state(MEDIA_TYPE, require)`. They run before any
//! extractor touches the body and never modify the wrapped handler's
//! response.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::ApiError;

pub const JSON: &str = "application/json";
pub const MULTIPART: &str = "multipart/form-data";

/// Reject with 406 unless the client accepts `required`
pub async fn accept(
    State(required): State<&'static str>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !accepts(request.headers(), required) {
        debug!("Rejecting {} {}: Accept excludes {}", request.method(), request.uri(), required);
        return Err(ApiError::NotAcceptable(required.to_string()));
    }
    Ok(next.run(request).await)
}

/// Reject with 415 unless the request body is declared as `expected`
pub async fn require(
    State(expected): State<&'static str>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !content_type_is(request.headers(), expected) {
        debug!(
            "Rejecting {} {}: Content-Type is not {}",
            request.method(),
            request.uri(),
            expected
        );
        return Err(ApiError::UnsupportedMediaType(expected.to_string()));
    }
    Ok(next.run(request).await)
}

/// Whether the `Accept` headers admit `media_type`
///
/// A request without `Accept` accepts anything. Ranges match exactly, by
/// `type/*` or by `*/*`; ranges with `q=0` never match.
pub fn accepts(headers: &HeaderMap, media_type: &str) -> bool {
    let mut values = headers.get_all(header::ACCEPT).iter().peekable();
    if values.peek().is_none() {
        return true;
    }

    let media_type = media_type.to_ascii_lowercase();
    let main_type = media_type.split('/').next().unwrap_or_default();

    values
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(parse_media_range)
        .any(|(range, quality)| {
            quality > 0.0
                && (range == "*/*"
                    || range == media_type
                    || range
                        .strip_suffix("/*")
                        .is_some_and(|range_type| range_type == main_type))
        })
}

/// Whether `Content-Type` (ignoring parameters) equals `expected`
pub fn content_type_is(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| essence(value).eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

fn essence(value: &str) -> &str {
    value.split(';').next().unwrap_or_default().trim()
}

// "text/html;level=1;q=0.5" -> ("text/html", 0.5)
fn parse_media_range(item: &str) -> Option<(String, f32)> {
    let mut parts = item.split(';');
    let range = parts.next()?.trim().to_ascii_lowercase();
    if range.is_empty() {
        return None;
    }

    let mut quality = 1.0;
    for param in parts {
        if let Some((key, value)) = param.split_once('=') {
            if key.trim().eq_ignore_ascii_case("q") {
                quality = value.trim().parse().unwrap_or(0.0);
            }
        }
    }
    Some((range, quality))
}
