//! Error types for name resolution and the match cache.

use std::path::PathBuf;

use thiserror::Error;
use xref_model::{MatchSet, ModelError};

/// Errors from a resolution run.
///
/// Every variant that stops a run part-way carries the matches committed
/// before it stopped.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The roster pool ran out while free-text names were still unmatched.
    #[error(
        "roster pool exhausted with {} free-text name(s) unmatched ({} matched before failure)",
        .unmatched.len(),
        .partial.len()
    )]
    UnresolvableSurplus {
        unmatched: Vec<String>,
        partial: MatchSet,
    },

    /// The pass cap was reached before every name was matched.
    #[error("matching stopped after {passes} passes with {} name(s) unmatched", .unmatched.len())]
    PassLimitExceeded {
        passes: u32,
        unmatched: Vec<String>,
        partial: MatchSet,
    },

    /// Options that would never make progress.
    #[error("invalid match options: {0}")]
    InvalidOptions(String),

    /// A commit violated the one-to-one invariant.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl MatchError {
    /// Matches committed before the run stopped, if any.
    pub fn partial(&self) -> Option<&MatchSet> {
        match self {
            Self::UnresolvableSurplus { partial, .. } | Self::PassLimitExceeded { partial, .. } => {
                Some(partial)
            }
            Self::InvalidOptions(_) | Self::Model(_) => None,
        }
    }

    /// Names left unmatched when the run stopped.
    pub fn unmatched(&self) -> &[String] {
        match self {
            Self::UnresolvableSurplus { unmatched, .. }
            | Self::PassLimitExceeded { unmatched, .. } => unmatched,
            Self::InvalidOptions(_) | Self::Model(_) => &[],
        }
    }
}

/// Errors from reading or writing cached mappings.
#[derive(Debug, Error)]
pub enum CacheError {
    /// File I/O error.
    #[error("failed to {operation} match cache file: {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cached document exists but does not parse as a mapping.
    #[error("match cache file is corrupt: {path}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Mapping could not be serialized.
    #[error("failed to serialize mapping: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Temp file was written but could not replace the target.
    #[error("failed to move {temp_path} into place at {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// In-memory store lock was poisoned by a panicking writer.
    #[error("match cache lock poisoned")]
    Poisoned,
}
