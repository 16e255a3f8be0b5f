//! Configuration options for a cross-reference run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Knobs for the threshold-relaxation matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Threshold used by the first pass.
    pub start_threshold: u8,
    /// Amount the threshold drops after every pass.
    pub threshold_step: u8,
    /// Multi-token names are compared with full names only while the
    /// threshold is strictly above this value.
    pub multi_token_threshold: u8,
    /// Hard cap on the number of passes. The last permitted pass accepts any score.
    pub max_passes: u32,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            start_threshold: 100,
            threshold_step: 2,
            multi_token_threshold: 70,
            max_passes: 50,
        }
    }
}

/// Options for dropping inactive players after the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneOptions {
    /// Players with fewer minutes than this are dropped.
    pub min_minutes: u32,
    /// Also drop unavailable players whose injury or suspension has a known return.
    pub remove_injured: bool,
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            min_minutes: 90,
            remove_injured: false,
        }
    }
}

/// Options for flattening merged rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// Appended to a stats field whose name is already used by a roster field.
    pub collision_suffix: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            collision_suffix: "_stats".to_string(),
        }
    }
}

/// Top-level pipeline configuration, usually read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub matching: MatchOptions,
    /// Free-text name → replacement, applied to the stats feed before matching.
    pub renames: BTreeMap<String, String>,
    pub prune: PruneOptions,
    pub merge: MergeOptions,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renames(mut self, renames: BTreeMap<String, String>) -> Self {
        self.renames = renames;
        self
    }

    pub fn with_prune(mut self, prune: PruneOptions) -> Self {
        self.prune = prune;
        self
    }
}
