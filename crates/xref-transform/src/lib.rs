//! Post-match data shaping.
//!
//! Takes the parsed snapshots and a resolved mapping and produces the joined
//! per-player dataset.
//!
//! # Features
//!
//! - **Preprocessing**: name cleanup and manual rename overrides
//! - **Merge**: inner join on roster id, failing on join-key collisions
//! - **Pruning**: drops players with too few minutes or no expected return
//! - **Export**: flat records with numeric coercion, written as JSON or CSV

mod error;
mod export;
mod merge;
mod preprocess;
mod prune;
mod record;

// === Error Types ===
pub use error::{ExportError, MergeError};

// === Preprocessing ===
pub use preprocess::{apply_renames, clean_name, prepare_stats};

// === Merge ===
pub use merge::{MergeIssue, MergeOutput, MergeReport, MergedPlayer, merge};

// === Pruning ===
pub use prune::{PruneReport, prune};

// === Export ===
pub use export::{joined_data_path, write_csv, write_json};
pub use record::{FlatRecord, coerce_numeric};
