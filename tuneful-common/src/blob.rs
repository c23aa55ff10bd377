//! Directory-backed blob store for uploaded file bytes
//!
//! One file per blob, named by its sanitized filename. Writes land in a
//! hidden temporary sibling and are renamed into place, so readers never see
//! a partially written blob. Concurrent writes to the same key are
//! last-writer-wins.

use crate::{Error, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Reduce a client supplied filename to a safe, flat blob key
///
/// Only the last path component survives. Characters that are illegal in
/// filenames on any platform are dropped, reserved names (`..`, `CON`, ...)
/// become empty, and leading dots and whitespace are stripped so keys never
/// look like hidden files or temporary writes. The result may be empty.
pub fn sanitize_key(filename: &str) -> String {
    let mut key = filename.rsplit(['/', '\\']).next().unwrap_or_default().to_string();
    loop {
        let trimmed = key.trim_start_matches(|c: char| c == '.' || c.is_whitespace());
        let next = sanitize_component(trimmed);
        if next == key {
            return key;
        }
        key = next;
    }
}

// Portable rules regardless of host OS, illegal characters dropped
fn sanitize_component(name: &str) -> String {
    sanitize_filename::sanitize_with_options(
        name,
        sanitize_filename::Options {
            windows: true,
            truncate: true,
            replacement: "",
        },
    )
}

/// Blob store rooted at a single directory
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage directory if missing
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Sanitized key for `filename`, rejecting names with nothing usable left
    pub fn key(filename: &str) -> Result<String> {
        let key = sanitize_key(filename);
        if key.is_empty() {
            return Err(Error::InvalidFilename(filename.to_string()));
        }
        Ok(key)
    }

    /// Store `bytes` under the sanitized form of `filename`
    ///
    /// Returns the key the blob was stored under.
    pub async fn write(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let key = Self::key(filename)?;
        let target = self.root.join(&key);
        let temp = self.root.join(format!(
            ".{}.{}.{}.part",
            key,
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        if let Err(e) = tokio::fs::write(&temp, bytes).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&temp, &target).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        debug!("Stored blob {} ({} bytes)", key, bytes.len());
        Ok(key)
    }

    /// Read the blob stored under exactly `key`
    ///
    /// Names that are not already sanitized keys never resolve.
    pub async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if !is_key(key) {
            return Ok(None);
        }
        match tokio::fs::read(self.root.join(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a blob is stored under exactly `key`
    pub async fn exists(&self, key: &str) -> Result<bool> {
        if !is_key(key) {
            return Ok(false);
        }
        let meta = match tokio::fs::metadata(self.root.join(key)).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };
        Ok(meta.is_file())
    }
}

fn is_key(name: &str) -> bool {
    !name.is_empty() && sanitize_key(name) == name
}
