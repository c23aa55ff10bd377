//! Canonical JSON representations of songs and files
//!
//! Pure mappings from loaded records; nothing here touches the stores.

use serde::Serialize;
use tuneful_common::db::{File, Song};

/// `{"id", "file": {"id", "filename"}}`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SongResource {
    pub id: i64,
    pub file: FileSummary,
}

/// File as embedded in a song
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileSummary {
    pub id: i64,
    pub filename: String,
}

/// `{"id", "filename", "path"}` with an absolute download URL
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileResource {
    pub id: i64,
    pub filename: String,
    pub path: String,
}

/// Response to a successful upload
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UploadResource {
    pub path: String,
}

impl From<&Song> for SongResource {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id,
            file: FileSummary {
                id: song.file.id,
                filename: song.file.filename.clone(),
            },
        }
    }
}

impl FileResource {
    pub fn new(file: &File, base_url: &str) -> Self {
        Self {
            id: file.id,
            filename: file.filename.clone(),
            path: download_url(base_url, &file.filename),
        }
    }
}

/// Absolute URL of the download endpoint for `filename`
pub fn download_url(base_url: &str, filename: &str) -> String {
    format!(
        "{}/uploads/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(filename)
    )
}

/// Absolute URL of the get-one endpoint for song `id`
pub fn song_url(base_url: &str, id: i64) -> String {
    format!("{}/api/songs/{}", base_url.trim_end_matches('/'), id)
}
