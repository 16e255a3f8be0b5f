//! Post-merge removal of inactive and unavailable players.

use serde::Serialize;
use tracing::info;
use xref_model::{PruneOptions, RosterPlayer};

use crate::merge::MergedPlayer;

/// Why rows were removed by [`prune`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub kept: usize,
    pub below_min_minutes: usize,
    /// Zero chance of playing with no known return.
    pub unavailable: usize,
    /// Zero chance of playing but kept because a return is expected.
    pub injured_kept: usize,
}

/// Drop players who have barely played or are not expected back.
pub fn prune(players: Vec<MergedPlayer>, options: &PruneOptions) -> (Vec<MergedPlayer>, PruneReport) {
    let mut report = PruneReport::default();
    let mut kept = Vec::with_capacity(players.len());

    for player in players {
        if player.roster.minutes < options.min_minutes {
            report.below_min_minutes += 1;
            continue;
        }
        if player.roster.chance_of_playing_next_round == Some(0) {
            if !options.remove_injured && expected_back(&player.roster) {
                report.injured_kept += 1;
            } else {
                report.unavailable += 1;
                continue;
            }
        }
        kept.push(player);
    }

    report.kept = kept.len();
    info!(
        kept = report.kept,
        below_min_minutes = report.below_min_minutes,
        min_minutes = options.min_minutes,
        unavailable = report.unavailable,
        injured_kept = report.injured_kept,
        "pruned merged players"
    );
    (kept, report)
}

/// Injured or suspended with a return date that is not "unknown".
fn expected_back(player: &RosterPlayer) -> bool {
    let news = player.news.to_lowercase();
    (news.contains("injury") || news.contains("suspended")) && !news.contains("unknown")
}
