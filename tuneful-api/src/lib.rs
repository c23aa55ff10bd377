//! tuneful-api library - song and upload HTTP service
//!
//! JSON resource API over the song store plus a directory-backed upload
//! area. Every `/api` route is content negotiated; write routes additionally
//! check the request body's declared media type.

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tuneful_common::config::DEFAULT_MAX_UPLOAD_BYTES;
use tuneful_common::BlobStore;

pub mod api;
pub mod error;
pub mod resources;
pub mod schema;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Resource store connection pool
    pub db: SqlitePool,
    /// Uploaded file bytes
    pub blobs: BlobStore,
    /// Externally visible base URL, overrides the `Host` header for links
    pub public_url: Option<String>,
    /// Maximum upload request body size
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, blobs: BlobStore) -> Self {
        Self {
            db,
            blobs,
            public_url: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            startup_time: Utc::now(),
        }
    }

    pub fn with_public_url(mut self, public_url: Option<String>) -> Self {
        self.public_url = public_url;
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build application router
///
/// Negotiation order: `Accept` (406) is checked outside `Content-Type` (415),
/// and both before any body extraction.
pub fn build_router(state: AppState) -> Router {
    use api::negotiate::{accept, require, JSON, MULTIPART};
    use axum::extract::DefaultBodyLimit;
    use axum::middleware::from_fn_with_state;
    use axum::routing::{get, post};
    use tower_http::trace::TraceLayer;

    // JSON resource routes
    let resources = Router::new()
        .route(
            "/api/songs",
            get(api::list_songs)
                .merge(post(api::create_song).layer(from_fn_with_state(JSON, require))),
        )
        .route("/api/songs/:id", get(api::get_song).delete(api::delete_song))
        .route("/api/songs/:id/file", get(api::get_song_file))
        .route(
            "/api/files",
            post(api::upload_file).layer(from_fn_with_state(MULTIPART, require)),
        )
        .route_layer(from_fn_with_state(JSON, accept))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    // Raw uploads also admit the file's own type, checked in the handler
    let uploads = Router::new().route("/uploads/:filename", get(api::download_file));

    Router::new()
        .merge(resources)
        .merge(uploads)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
