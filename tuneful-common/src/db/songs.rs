//! Song database operations
//!
//! Songs are always read together with their file (inner join), which is the
//! only way a song can exist.

use super::models::{File, Song};
use crate::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_SONG: &str = r#"
    SELECT songs.id AS song_id, files.id AS file_id, files.filename AS filename
    FROM songs
    INNER JOIN files ON files.song_id = songs.id
"#;

fn song_from_row(row: &SqliteRow) -> Song {
    Song {
        id: row.get("song_id"),
        file: File {
            id: row.get("file_id"),
            filename: row.get("filename"),
        },
    }
}

/// Create a song and its file in a single transaction
///
/// Ids are assigned by the database.
pub async fn create_song(pool: &SqlitePool, filename: &str) -> Result<Song> {
    let mut tx = pool.begin().await?;

    let song_id = sqlx::query("INSERT INTO songs DEFAULT VALUES")
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    let file_id = sqlx::query("INSERT INTO files (filename, song_id) VALUES (?, ?)")
        .bind(filename)
        .bind(song_id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    tx.commit().await?;

    Ok(Song {
        id: song_id,
        file: File {
            id: file_id,
            filename: filename.to_string(),
        },
    })
}

/// Load song by id
pub async fn load_song(pool: &SqlitePool, id: i64) -> Result<Option<Song>> {
    let row = sqlx::query(&format!("{} WHERE songs.id = ?", SELECT_SONG))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(song_from_row))
}

/// Load all songs ordered by ascending id
pub async fn load_all_songs(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query(&format!("{} ORDER BY songs.id", SELECT_SONG))
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(song_from_row).collect())
}

/// Load the song with the lowest id, if any
pub async fn first_song(pool: &SqlitePool) -> Result<Option<Song>> {
    let row = sqlx::query(&format!("{} ORDER BY songs.id LIMIT 1", SELECT_SONG))
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(song_from_row))
}

/// Delete a song and its file row in a single transaction
///
/// Returns `false` when no song with that id exists.
pub async fn delete_song(pool: &SqlitePool, id: i64) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM files WHERE song_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let deleted = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if deleted == 0 {
        // Nothing to remove, leave the store untouched
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    Ok(true)
}

/// Count total songs in database
pub async fn count_songs(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Count total file rows in database
pub async fn count_files(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
