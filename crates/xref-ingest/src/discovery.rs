//! Snapshot discovery for a data directory.
//!
//! The retrieval layer files each run's raw feeds as
//! `{run_key}_roster.json` and `{run_key}_stats.json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use xref_model::{RosterPlayer, RunKey, StatsPlayer};

use crate::error::{IngestError, Result};
use crate::feed::{parse_roster_feed, parse_stats_feed};

const ROSTER_SUFFIX: &str = "_roster.json";
const STATS_SUFFIX: &str = "_stats.json";

/// Locations of one run's raw feed snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub roster: PathBuf,
    pub stats: PathBuf,
}

impl SnapshotPaths {
    pub fn for_run(data_dir: &Path, run_key: &RunKey) -> Self {
        Self {
            roster: data_dir.join(format!("{run_key}{ROSTER_SUFFIX}")),
            stats: data_dir.join(format!("{run_key}{STATS_SUFFIX}")),
        }
    }
}

/// Both feeds of one run, parsed.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub roster: Vec<RosterPlayer>,
    pub stats: Vec<StatsPlayer>,
}

/// Load and parse both snapshots for a run.
pub fn load_snapshot(data_dir: &Path, run_key: &RunKey) -> Result<Snapshot> {
    let paths = SnapshotPaths::for_run(data_dir, run_key);
    let roster = parse_roster_feed(&read_json(&paths.roster)?)?;
    let stats = parse_stats_feed(&read_json(&paths.stats)?)?;
    info!(
        run_key = %run_key,
        roster = roster.len(),
        stats = stats.len(),
        "loaded feed snapshots"
    );
    Ok(Snapshot { roster, stats })
}

/// Lists run keys that have a roster snapshot in `data_dir`.
///
/// Returns keys sorted ascending, so date-stamped keys come out oldest first.
pub fn list_run_keys(data_dir: &Path) -> Result<Vec<RunKey>> {
    if !data_dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: data_dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(data_dir).map_err(|e| IngestError::DirectoryRead {
        path: data_dir.to_path_buf(),
        source: e,
    })?;

    let mut keys = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: data_dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(prefix) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(ROSTER_SUFFIX))
        else {
            continue;
        };
        if let Ok(key) = RunKey::new(prefix) {
            keys.push(key);
        }
    }

    keys.sort();
    Ok(keys)
}

/// Most recent run key with a roster snapshot, if any.
pub fn latest_run_key(data_dir: &Path) -> Result<Option<RunKey>> {
    Ok(list_run_keys(data_dir)?.pop())
}

fn read_json(path: &Path) -> Result<Value> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(path).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&contents).map_err(|e| IngestError::JsonParse {
        path: path.to_path_buf(),
        source: e,
    })
}
