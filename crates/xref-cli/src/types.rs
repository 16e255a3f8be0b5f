use std::collections::BTreeMap;
use std::path::PathBuf;

use xref_map::Resolution;
use xref_model::{PipelineOptions, RosterId, RunKey};
use xref_transform::{MergeReport, PruneReport};

/// Which joined-data files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportFormats {
    pub json: bool,
    pub csv: bool,
}

impl ExportFormats {
    pub const BOTH: Self = Self {
        json: true,
        csv: true,
    };
}

/// Everything a pipeline run needs, resolved from flags and config.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub run_key: RunKey,
    /// `None` disables the match cache.
    pub cache_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub formats: ExportFormats,
    pub options: PipelineOptions,
}

#[derive(Debug)]
pub struct ResolveResult {
    pub run_key: RunKey,
    pub roster_players: usize,
    /// Roster players eligible for matching.
    pub canonical: usize,
    pub stats_rows: usize,
    pub names: Vec<String>,
    /// Full names by roster id, for display.
    pub roster_names: BTreeMap<RosterId, String>,
    pub resolution: Resolution,
}

#[derive(Debug)]
pub struct RunResult {
    pub resolve: ResolveResult,
    pub merge: MergeReport,
    pub prune: PruneReport,
    pub records: usize,
    pub outputs: Vec<PathBuf>,
}
