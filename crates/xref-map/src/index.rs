//! Canonical roster names available as assignment targets.

use std::collections::BTreeMap;

use tracing::debug;
use xref_model::{RosterId, RosterPlayer};

/// Full and short canonical forms of one roster player's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalNames {
    pub full: String,
    pub short: String,
}

/// Live table of canonical names keyed by roster id.
///
/// Entries are removed as they are claimed, so the index only ever shrinks
/// during a run. Iteration is in ascending roster id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex {
    entries: BTreeMap<RosterId, CanonicalNames>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the canonical pool from a roster, leaving out players who have
    /// not played a minute.
    pub fn from_roster(players: &[RosterPlayer]) -> Self {
        let mut index = Self::new();
        let mut excluded = 0usize;
        for player in players {
            if !player.has_played() {
                excluded += 1;
                continue;
            }
            index.insert(player.id, player.full_name(), player.short_name());
        }
        debug!(
            canonical = index.len(),
            excluded, "built name index (players without minutes excluded)"
        );
        index
    }

    /// Add or replace an entry, returning the previous names for that id.
    pub fn insert(
        &mut self,
        roster_id: RosterId,
        full: impl Into<String>,
        short: impl Into<String>,
    ) -> Option<CanonicalNames> {
        self.entries.insert(
            roster_id,
            CanonicalNames {
                full: full.into(),
                short: short.into(),
            },
        )
    }

    pub fn get(&self, roster_id: RosterId) -> Option<&CanonicalNames> {
        self.entries.get(&roster_id)
    }

    pub fn contains(&self, roster_id: RosterId) -> bool {
        self.entries.contains_key(&roster_id)
    }

    pub fn remove(&mut self, roster_id: RosterId) -> Option<CanonicalNames> {
        self.entries.remove(&roster_id)
    }

    /// Remove the row whose full or short name equals `value`.
    ///
    /// When several rows carry the same string, the lowest roster id goes.
    /// The engine itself removes by id through [`NameIndex::remove`].
    pub fn remove_by_value(&mut self, value: &str) -> Option<RosterId> {
        let roster_id = self
            .entries
            .iter()
            .find(|(_, names)| names.full == value || names.short == value)
            .map(|(id, _)| *id)?;
        self.entries.remove(&roster_id);
        Some(roster_id)
    }

    pub fn full_names(&self) -> impl Iterator<Item = (RosterId, &str)> {
        self.entries
            .iter()
            .map(|(id, names)| (*id, names.full.as_str()))
    }

    pub fn short_names(&self) -> impl Iterator<Item = (RosterId, &str)> {
        self.entries
            .iter()
            .map(|(id, names)| (*id, names.short.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
