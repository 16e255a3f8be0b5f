//! Resolved name mappings and their confidence diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, Result};
use crate::ids::RosterId;

/// One committed match between a free-text name and a roster player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub free_text_name: String,
    pub roster_id: RosterId,
    /// Similarity at which the match was committed; 150 marks an exact match.
    pub confidence: u8,
}

/// The full set of matches produced by one resolution run.
///
/// Both sides are kept one-to-one: a free-text name and a roster id each
/// appear in at most one record. Serialized as the two-element document
/// `[mapping, confidence]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    mapping: BTreeMap<String, RosterId>,
    confidence: BTreeMap<String, u8>,
}

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a set from its persisted halves, re-checking the one-to-one invariant.
    pub fn from_parts(
        mapping: BTreeMap<String, RosterId>,
        confidence: BTreeMap<String, u8>,
    ) -> Result<Self> {
        if mapping.len() != confidence.len() || !mapping.keys().eq(confidence.keys()) {
            return Err(ModelError::MismatchedConfidence);
        }
        let mut set = Self::new();
        for (name, roster_id) in mapping {
            let confidence = confidence[&name];
            set.insert(MatchRecord {
                free_text_name: name,
                roster_id,
                confidence,
            })?;
        }
        Ok(set)
    }

    /// Append a record. Fails if either side is already matched.
    pub fn insert(&mut self, record: MatchRecord) -> Result<()> {
        if self.mapping.contains_key(&record.free_text_name) {
            return Err(ModelError::DuplicateName(record.free_text_name));
        }
        if self.contains_roster_id(record.roster_id) {
            return Err(ModelError::DuplicateRosterId(record.roster_id));
        }
        self.confidence
            .insert(record.free_text_name.clone(), record.confidence);
        self.mapping.insert(record.free_text_name, record.roster_id);
        Ok(())
    }

    pub fn roster_id(&self, free_text_name: &str) -> Option<RosterId> {
        self.mapping.get(free_text_name).copied()
    }

    pub fn confidence(&self, free_text_name: &str) -> Option<u8> {
        self.confidence.get(free_text_name).copied()
    }

    pub fn get(&self, free_text_name: &str) -> Option<MatchRecord> {
        let (name, roster_id) = self.mapping.get_key_value(free_text_name)?;
        Some(MatchRecord {
            free_text_name: name.clone(),
            roster_id: *roster_id,
            confidence: self.confidence[name],
        })
    }

    pub fn contains_roster_id(&self, roster_id: RosterId) -> bool {
        self.mapping.values().any(|id| *id == roster_id)
    }

    pub fn mapping(&self) -> &BTreeMap<String, RosterId> {
        &self.mapping
    }

    pub fn confidences(&self) -> &BTreeMap<String, u8> {
        &self.confidence
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Records ordered by free-text name.
    pub fn iter(&self) -> impl Iterator<Item = MatchRecord> + '_ {
        self.mapping.iter().map(|(name, roster_id)| MatchRecord {
            free_text_name: name.clone(),
            roster_id: *roster_id,
            confidence: self.confidence[name],
        })
    }

    pub fn summary(&self) -> MatchSummary {
        let matched = self.confidence.len();
        let min_confidence = self.confidence.values().copied().min();
        let max_confidence = self.confidence.values().copied().max();
        let mean_confidence = if matched == 0 {
            None
        } else {
            let total: u64 = self.confidence.values().map(|c| u64::from(*c)).sum();
            Some(total as f64 / matched as f64)
        };
        MatchSummary {
            matched,
            mean_confidence,
            min_confidence,
            max_confidence,
        }
    }
}

impl Serialize for MatchSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (&self.mapping, &self.confidence).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MatchSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (mapping, confidence): (BTreeMap<String, RosterId>, BTreeMap<String, u8>) =
            Deserialize::deserialize(deserializer)?;
        Self::from_parts(mapping, confidence).map_err(serde::de::Error::custom)
    }
}

/// Aggregate confidence statistics for a set of matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub matched: usize,
    pub mean_confidence: Option<f64>,
    pub min_confidence: Option<u8>,
    pub max_confidence: Option<u8>,
}
