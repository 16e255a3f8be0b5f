pub mod error;
pub mod ids;
pub mod mapping;
pub mod options;
pub mod player;

pub use error::{ModelError, Result};
pub use ids::{RosterId, RunKey};
pub use mapping::{MatchRecord, MatchSet, MatchSummary};
pub use options::{MatchOptions, MergeOptions, PipelineOptions, PruneOptions};
pub use player::{Position, RosterPlayer, StatsPlayer};
