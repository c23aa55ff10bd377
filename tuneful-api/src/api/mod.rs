//! HTTP API handlers for tuneful

pub mod base_url;
pub mod files;
pub mod health;
pub mod negotiate;
pub mod songs;

pub use base_url::BaseUrl;
pub use files::{download_file, upload_file};
pub use health::health_routes;
pub use songs::{create_song, delete_song, get_song, get_song_file, list_songs};
