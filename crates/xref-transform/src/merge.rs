//! Inner join of roster and stats rows through a resolved mapping.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};
use xref_model::{MatchSet, RosterId, RosterPlayer, StatsPlayer};

use crate::error::MergeError;

/// One roster player joined with their stats row.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedPlayer {
    pub roster_id: RosterId,
    pub roster: RosterPlayer,
    pub stats: StatsPlayer,
}

/// A row that could not be joined even though it was matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MergeIssue {
    /// The mapping points at an id the roster snapshot does not contain.
    MissingRosterPlayer {
        free_text_name: String,
        roster_id: RosterId,
    },
    /// A later stats row repeats a name that already joined; the first row is kept.
    DuplicateStatsName {
        free_text_name: String,
        roster_id: RosterId,
    },
}

/// Counts of rows the inner join left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub joined: usize,
    /// Stats rows whose name is not in the mapping.
    pub dropped_stats: usize,
    /// Roster players nobody matched.
    pub dropped_roster: usize,
    pub issues: Vec<MergeIssue>,
}

#[derive(Debug, Clone, Default)]
pub struct MergeOutput {
    /// Joined rows in ascending roster id order.
    pub players: Vec<MergedPlayer>,
    pub report: MergeReport,
}

/// Join `stats` onto `roster` using `matches`.
///
/// Unmatched rows on either side are dropped. A matched row whose roster id
/// is missing from the roster, or whose name repeats an earlier joined row,
/// is reported and dropped.
///
/// # Errors
///
/// Fails if the roster repeats an id, or if two different names land on the
/// same roster player.
pub fn merge(
    roster: &[RosterPlayer],
    stats: &[StatsPlayer],
    matches: &MatchSet,
) -> Result<MergeOutput, MergeError> {
    let mut by_id: BTreeMap<RosterId, &RosterPlayer> = BTreeMap::new();
    for player in roster {
        if by_id.insert(player.id, player).is_some() {
            return Err(MergeError::DuplicateRosterId(player.id));
        }
    }

    let mut joined: BTreeMap<RosterId, MergedPlayer> = BTreeMap::new();
    let mut report = MergeReport::default();

    for row in stats {
        let Some(roster_id) = matches.roster_id(&row.free_text_name) else {
            report.dropped_stats += 1;
            continue;
        };
        let Some(roster_player) = by_id.get(&roster_id) else {
            warn!(
                name = %row.free_text_name,
                roster_id = %roster_id,
                "matched roster id not present in roster snapshot"
            );
            report.issues.push(MergeIssue::MissingRosterPlayer {
                free_text_name: row.free_text_name.clone(),
                roster_id,
            });
            report.dropped_stats += 1;
            continue;
        };
        if let Some(existing) = joined.get(&roster_id) {
            if existing.stats.free_text_name == row.free_text_name {
                warn!(name = %row.free_text_name, "repeated stats row dropped");
                report.issues.push(MergeIssue::DuplicateStatsName {
                    free_text_name: row.free_text_name.clone(),
                    roster_id,
                });
                report.dropped_stats += 1;
                continue;
            }
            return Err(MergeError::JoinKeyCollision {
                roster_id,
                first: existing.stats.free_text_name.clone(),
                second: row.free_text_name.clone(),
            });
        }
        joined.insert(
            roster_id,
            MergedPlayer {
                roster_id,
                roster: (*roster_player).clone(),
                stats: row.clone(),
            },
        );
    }

    report.joined = joined.len();
    report.dropped_roster = roster.len() - joined.len();
    info!(
        joined = report.joined,
        dropped_stats = report.dropped_stats,
        dropped_roster = report.dropped_roster,
        "merged datasets"
    );

    Ok(MergeOutput {
        players: joined.into_values().collect(),
        report,
    })
}
