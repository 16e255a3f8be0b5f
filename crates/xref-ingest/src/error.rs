//! Error types for feed ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or parsing feed snapshots.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Snapshot file not found.
    #[error("snapshot file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON.
    #[error("failed to parse JSON {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // === Feed Shape Errors ===
    /// Identifier is not a non-negative integer that fits a roster id.
    #[error("invalid identifier {value} in {context}: expected an integer id")]
    InvalidIdentifier { value: String, context: String },

    /// Top-level document has an unexpected structure.
    #[error("unexpected {feed} feed shape: {reason}")]
    UnexpectedShape { feed: &'static str, reason: String },

    /// Required field missing from a record.
    #[error("{feed} record {record} is missing required field '{field}'")]
    MissingField {
        feed: &'static str,
        field: &'static str,
        record: String,
    },

    /// Field present but with the wrong type or range.
    #[error("{feed} record {record} has invalid '{field}': {reason}")]
    InvalidField {
        feed: &'static str,
        field: &'static str,
        record: String,
        reason: String,
    },
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
