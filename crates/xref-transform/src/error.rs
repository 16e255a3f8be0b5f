//! Error types for merging and export.

use std::path::PathBuf;

use thiserror::Error;
use xref_model::RosterId;

/// Errors that stop a merge outright.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// The roster snapshot lists the same id twice.
    #[error("roster contains id {0} more than once")]
    DuplicateRosterId(RosterId),

    /// Two stats rows resolved to the same roster player.
    #[error("stats rows '{first}' and '{second}' both resolve to roster id {roster_id}")]
    JoinKeyCollision {
        roster_id: RosterId,
        first: String,
        second: String,
    },
}

/// Errors while writing merged output.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write JSON to {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write CSV to {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
