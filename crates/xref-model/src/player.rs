//! Player records as delivered by the two providers.
//!
//! The roster feed carries official names and durable numeric ids; the stats
//! feed carries only a free-text display name. Neither shares a key with the
//! other, which is what the matching engine resolves.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::RosterId;

/// Playing position derived from the roster feed's `element_type` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
    /// Code outside the documented 1..=4 range.
    Unknown(i64),
}

impl Position {
    pub fn from_element_type(code: i64) -> Self {
        match code {
            1 => Self::Goalkeeper,
            2 => Self::Defender,
            3 => Self::Midfielder,
            4 => Self::Forward,
            other => Self::Unknown(other),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Goalkeeper => "Goalkeeper",
            Self::Defender => "Defender",
            Self::Midfielder => "Midfielder",
            Self::Forward => "Forward",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A player from the structured roster feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterPlayer {
    pub id: RosterId,
    pub first_name: String,
    pub second_name: String,
    /// Display name used on the roster provider's own site.
    pub web_name: String,
    pub minutes: u32,
    pub position: Position,
    pub team: Option<i64>,
    /// Percentage chance of playing in the next round; `None` when no news.
    pub chance_of_playing_next_round: Option<u8>,
    pub news: String,
    /// Every other field of the feed record, kept verbatim.
    pub stats: BTreeMap<String, Value>,
}

impl RosterPlayer {
    /// Canonical full name: given name followed by family name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.second_name.trim())
            .trim()
            .to_string()
    }

    /// Canonical short name, the roster feed's display alias.
    pub fn short_name(&self) -> &str {
        self.web_name.trim()
    }

    pub fn has_played(&self) -> bool {
        self.minutes > 0
    }
}

/// A player from the free-text advanced-stats feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsPlayer {
    pub free_text_name: String,
    pub stats: BTreeMap<String, Value>,
}

impl StatsPlayer {
    pub fn new(free_text_name: impl Into<String>) -> Self {
        Self {
            free_text_name: free_text_name.into(),
            stats: BTreeMap::new(),
        }
    }

    pub fn with_stat(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.stats.insert(name.into(), value.into());
        self
    }
}
