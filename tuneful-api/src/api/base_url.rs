//! Request base URL extractor
//!
//! Absolute links (the `Location` header, file download paths) are built from
//! the configured public URL when set, else from the request's `Host`.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::convert::Infallible;

use crate::AppState;

/// Scheme and authority without a trailing slash, e.g. `http://localhost:8080`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(pub String);

impl BaseUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl FromRequestParts<AppState> for BaseUrl {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(public_url) = &state.public_url {
            return Ok(BaseUrl(public_url.trim_end_matches('/').to_string()));
        }

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .or_else(|| parts.uri.authority().map(|authority| authority.as_str()))
            .unwrap_or("localhost");

        Ok(BaseUrl(format!("http://{}", host)))
    }
}
