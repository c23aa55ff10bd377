//! Song and File records

/// A song together with the file it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: i64,
    pub file: File,
}

/// Stored reference to an uploaded blob
///
/// Only the filename is persisted; the bytes live in the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub id: i64,
    pub filename: String,
}
