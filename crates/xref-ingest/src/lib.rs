//! Feed snapshot ingestion.
//!
//! This crate turns the raw documents written by the retrieval layer into the
//! typed records the matcher and merger work with.
//!
//! # Features
//!
//! - **Roster parsing**: array, id-keyed object and bootstrap shapes, with
//!   integer id checks before any matching starts
//! - **Stats parsing**: free-text `player_name` plus every other field kept
//! - **Discovery**: per-run snapshot paths and run-key listing
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use xref_ingest::load_snapshot;
//! use xref_model::RunKey;
//!
//! let run_key = RunKey::new("2021_10_19")?;
//! let snapshot = load_snapshot(Path::new(".data"), &run_key)?;
//! ```

mod discovery;
mod error;
mod feed;

// === Error Types ===
pub use error::{IngestError, Result};

// === Feed Parsing ===
pub use feed::{parse_roster_feed, parse_stats_feed, roster_id_from_value};

// === Snapshot Discovery ===
pub use discovery::{Snapshot, SnapshotPaths, latest_run_key, list_run_keys, load_snapshot};
