//! # Tuneful Common Library
//!
//! Shared code for the tuneful service and its tooling:
//! - Song/File records and the SQLite resource store
//! - Directory-backed blob store for uploaded bytes
//! - Configuration loading and root folder resolution
//! - Common error type

pub mod blob;
pub mod config;
pub mod db;
pub mod error;

pub use blob::BlobStore;
pub use error::{Error, Result};
