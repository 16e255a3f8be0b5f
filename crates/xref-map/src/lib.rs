//! Free-text to roster name resolution.
//!
//! The stats feed names players however it likes; the roster feed has
//! official names and durable ids. This crate maps one onto the other.
//!
//! # Features
//!
//! - **Scoring**: partial-ratio similarity with an exact-match override
//! - **Name index**: canonical full and short names, removed as claimed
//! - **Engine**: greedy one-to-one assignment under a relaxing threshold
//! - **Match cache**: per-run persisted mappings, file or in-memory
//!
//! # Example
//!
//! ```ignore
//! use xref_map::{NameIndex, ResolutionEngine};
//!
//! let index = NameIndex::from_roster(&roster);
//! let outcome = ResolutionEngine::default().resolve(&names, &index)?;
//! println!("{} matched", outcome.matches.len());
//! ```

mod engine;
mod error;
mod index;
mod repository;
mod resolve;
mod score;
mod utils;

// === Error Types ===
pub use error::{CacheError, MatchError};

// === Scoring ===
pub use score::{EXACT_MATCH_SCORE, PartialRatio, Similarity, partial_ratio, score};

// === Name Index ===
pub use index::{CanonicalNames, NameIndex};

// === Engine ===
pub use engine::{
    AmbiguousTie, Candidate, MatchOutcome, NameView, PassReport, ResolutionEngine,
    compare_candidates,
};

// === Match Cache ===
pub use repository::{FileMatchCache, MatchCache, MemoryMatchCache};
pub use resolve::{Resolution, ResolutionSource, RunContext, resolve};

// === Utilities ===
pub use utils::{dedupe_names, normalize_name};
