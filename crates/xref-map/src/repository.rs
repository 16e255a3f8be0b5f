//! Persisted match sets, one per run key.
//!
//! # Storage Format
//!
//! Each run's mapping is a JSON file named `{run_key}_player_matching.json`
//! holding the two-element document `[mapping, confidence]`. Entries are
//! all-or-nothing: a write either replaces the whole file or leaves the
//! previous one in place.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, info, warn};
use xref_model::{MatchSet, RunKey};

use crate::error::CacheError;

const FILE_SUFFIX: &str = "_player_matching.json";

/// Keyed store of previously resolved match sets.
pub trait MatchCache {
    /// Look up a run's mapping. Unreadable or corrupt entries count as absent.
    fn get(&self, run_key: &RunKey) -> Option<MatchSet>;

    /// Store a run's mapping, replacing any previous entry atomically.
    fn put(&self, run_key: &RunKey, matches: &MatchSet) -> Result<(), CacheError>;

    /// Delete a run's mapping. Returns whether an entry existed.
    fn invalidate(&self, run_key: &RunKey) -> Result<bool, CacheError>;
}

/// Directory-backed cache writing one JSON file per run key.
#[derive(Debug, Clone)]
pub struct FileMatchCache {
    base_dir: PathBuf,
}

impl FileMatchCache {
    /// Open a cache rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).map_err(|source| CacheError::Io {
            operation: "create directory for",
            path: base_dir.clone(),
            source,
        })?;
        Ok(Self { base_dir })
    }

    pub fn path_for(&self, run_key: &RunKey) -> PathBuf {
        self.base_dir.join(format!("{run_key}{FILE_SUFFIX}"))
    }

    /// Read a run's mapping, distinguishing "absent" from "corrupt".
    pub fn load(&self, run_key: &RunKey) -> Result<Option<MatchSet>, CacheError> {
        let path = self.path_for(run_key);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|source| CacheError::Io {
            operation: "read",
            path: path.clone(),
            source,
        })?;
        let matches =
            serde_json::from_str(&content).map_err(|source| CacheError::Corrupt { path, source })?;
        Ok(Some(matches))
    }
}

impl MatchCache for FileMatchCache {
    fn get(&self, run_key: &RunKey) -> Option<MatchSet> {
        match self.load(run_key) {
            Ok(Some(matches)) => {
                debug!(run_key = %run_key, matched = matches.len(), "match cache hit");
                Some(matches)
            }
            Ok(None) => {
                debug!(run_key = %run_key, "match cache miss");
                None
            }
            Err(error) => {
                warn!(run_key = %run_key, %error, "ignoring unreadable match cache entry");
                None
            }
        }
    }

    fn put(&self, run_key: &RunKey, matches: &MatchSet) -> Result<(), CacheError> {
        let path = self.path_for(run_key);
        let json = serde_json::to_string(matches).map_err(CacheError::Serialization)?;
        let temp_path = path.with_extension("json.tmp");

        let mut file = File::create(&temp_path).map_err(|source| CacheError::Io {
            operation: "create",
            path: temp_path.clone(),
            source,
        })?;
        file.write_all(json.as_bytes())
            .map_err(|source| CacheError::Io {
                operation: "write",
                path: temp_path.clone(),
                source,
            })?;
        file.sync_all().map_err(|source| CacheError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source,
        })?;
        drop(file);

        fs::rename(&temp_path, &path).map_err(|source| CacheError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.clone(),
            source,
        })?;

        info!("Saved {} matches to {}", matches.len(), path.display());
        Ok(())
    }

    fn invalidate(&self, run_key: &RunKey) -> Result<bool, CacheError> {
        let path = self.path_for(run_key);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path).map_err(|source| CacheError::Io {
            operation: "delete",
            path: path.clone(),
            source,
        })?;
        info!("Removed cached matches at {}", path.display());
        Ok(true)
    }
}

/// In-process cache holding serialized documents, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryMatchCache {
    entries: Mutex<BTreeMap<RunKey, String>>,
}

impl MemoryMatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw document, bypassing serialization.
    pub fn insert_raw(&self, run_key: RunKey, document: impl Into<String>) -> Result<(), CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Poisoned)?
            .insert(run_key, document.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MatchCache for MemoryMatchCache {
    fn get(&self, run_key: &RunKey) -> Option<MatchSet> {
        let entries = self.entries.lock().ok()?;
        let document = entries.get(run_key)?;
        match serde_json::from_str(document) {
            Ok(matches) => Some(matches),
            Err(error) => {
                warn!(run_key = %run_key, %error, "ignoring corrupt in-memory match cache entry");
                None
            }
        }
    }

    fn put(&self, run_key: &RunKey, matches: &MatchSet) -> Result<(), CacheError> {
        let document = serde_json::to_string(matches).map_err(CacheError::Serialization)?;
        self.insert_raw(run_key.clone(), document)
    }

    fn invalidate(&self, run_key: &RunKey) -> Result<bool, CacheError> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        Ok(entries.remove(run_key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use xref_model::{MatchRecord, RosterId};

    use super::*;

    fn sample() -> MatchSet {
        let mut set = MatchSet::new();
        set.insert(MatchRecord {
            free_text_name: "Son".to_string(),
            roster_id: RosterId::new(12),
            confidence: 150,
        })
        .unwrap();
        set
    }

    #[test]
    fn test_memory_cache_round_trip() {
        let cache = MemoryMatchCache::new();
        let key = RunKey::new("2021_10_19").unwrap();
        assert!(cache.get(&key).is_none());

        cache.put(&key, &sample()).unwrap();
        assert_eq!(cache.get(&key), Some(sample()));
        assert_eq!(cache.len(), 1);

        assert!(cache.invalidate(&key).unwrap());
        assert!(!cache.invalidate(&key).unwrap());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_memory_cache_corrupt_entry_is_a_miss() {
        let cache = MemoryMatchCache::new();
        let key = RunKey::new("2021_10_19").unwrap();
        cache.insert_raw(key.clone(), "{not json").unwrap();
        assert!(cache.get(&key).is_none());
    }
}
