//! File upload and download
//!
//! Uploads only persist bytes in the blob store; no database row is created.
//! Downloads are acceptable when `Accept` admits either JSON or the media
//! type inferred from the filename.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info};
use tuneful_common::BlobStore;

use super::{negotiate, BaseUrl};
use crate::error::{ApiError, ApiResult};
use crate::resources::{download_url, UploadResource};
use crate::AppState;

/// Multipart field carrying the uploaded file
pub const FILE_FIELD: &str = "file";

/// POST /api/files
pub async fn upload_file(
    State(state): State<AppState>,
    base: BaseUrl,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<UploadResource>)> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("Upload has no filename".to_string()))?;
        let data = field.bytes().await?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| {
        ApiError::BadRequest(format!("Missing multipart field '{}'", FILE_FIELD))
    })?;
    let key = BlobStore::key(&filename)
        .map_err(|_| ApiError::BadRequest(format!("Invalid filename: {:?}", filename)))?;

    state.blobs.write(&key, &data).await?;
    info!("Stored upload {} ({} bytes)", key, data.len());

    Ok((
        StatusCode::CREATED,
        Json(UploadResource {
            path: download_url(base.as_str(), &key),
        }),
    ))
}

/// GET /uploads/:filename
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    if !negotiate::accepts(&headers, negotiate::JSON)
        && !negotiate::accepts(&headers, mime.essence_str())
    {
        return Err(ApiError::NotAcceptable(mime.essence_str().to_string()));
    }

    let bytes = state.blobs.read(&filename).await?.ok_or_else(|| {
        debug!("Upload {:?} not found", filename);
        ApiError::NotFound(format!("Could not find file {}", filename))
    })?;

    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response())
}
