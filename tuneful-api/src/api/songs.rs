//! Song endpoints
//!
//! - `GET /api/songs` - all songs by ascending id
//! - `GET /api/songs/:id` - one song
//! - `GET /api/songs/:id/file` - the song's file with its download link
//! - `POST /api/songs` - create a song and its file
//! - `DELETE /api/songs/:id` - delete a song and its file

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{debug, info};
use tuneful_common::db::{songs, Song};

use super::BaseUrl;
use crate::error::{ApiError, ApiResult};
use crate::resources::{song_url, FileResource, SongResource};
use crate::schema::NewSong;
use crate::AppState;

fn song_not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Could not find song with id {}", id))
}

// Non-numeric ids can't name a song, so they are misses rather than 400s
fn parse_song_id(raw: &str) -> ApiResult<i64> {
    raw.parse().map_err(|_| song_not_found(raw))
}

async fn load_existing(state: &AppState, raw_id: &str) -> ApiResult<Song> {
    let id = parse_song_id(raw_id)?;
    songs::load_song(&state.db, id).await?.ok_or_else(|| {
        debug!("Song {} not found", id);
        song_not_found(raw_id)
    })
}

/// GET /api/songs
pub async fn list_songs(State(state): State<AppState>) -> ApiResult<Json<Vec<SongResource>>> {
    let songs = songs::load_all_songs(&state.db).await?;
    Ok(Json(songs.iter().map(SongResource::from).collect()))
}

/// GET /api/songs/:id
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SongResource>> {
    let song = load_existing(&state, &id).await?;
    Ok(Json(SongResource::from(&song)))
}

/// GET /api/songs/:id/file
pub async fn get_song_file(
    State(state): State<AppState>,
    base: BaseUrl,
    Path(id): Path<String>,
) -> ApiResult<Json<FileResource>> {
    let song = load_existing(&state, &id).await?;
    Ok(Json(FileResource::new(&song.file, base.as_str())))
}

/// POST /api/songs
///
/// The body is parsed by hand so malformed JSON and schema violations get the
/// same `{"message"}` shape as every other failure.
pub async fn create_song(
    State(state): State<AppState>,
    base: BaseUrl,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;
    let new_song = NewSong::from_value(payload)?;

    if new_song.has_client_ids() {
        debug!("Ignoring client supplied ids, the store assigns them");
    }

    let song = songs::create_song(&state.db, &new_song.file.filename).await?;
    info!("Created song {} (file {} {:?})", song.id, song.file.id, song.file.filename);

    let location = song_url(base.as_str(), song.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(SongResource::from(&song)),
    ))
}

/// DELETE /api/songs/:id
///
/// Responds with the first remaining song by id, or 204 when the store is now
/// empty.
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let song_id = parse_song_id(&id)?;
    if !songs::delete_song(&state.db, song_id).await? {
        debug!("Song {} not found for delete", song_id);
        return Err(song_not_found(&id));
    }
    info!("Deleted song {}", song_id);

    let response = match songs::first_song(&state.db).await? {
        Some(first) => Json(SongResource::from(&first)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}
