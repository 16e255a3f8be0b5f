//! Stats-row name cleanup ahead of matching.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};
use xref_model::StatsPlayer;

/// Trim a display name and collapse internal whitespace, keeping case.
pub fn clean_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace exact free-text names using a manual override table.
///
/// Returns how many rows were renamed.
pub fn apply_renames(stats: &mut [StatsPlayer], renames: &BTreeMap<String, String>) -> usize {
    if renames.is_empty() {
        return 0;
    }
    let mut renamed = 0;
    for player in stats.iter_mut() {
        if let Some(replacement) = renames.get(&player.free_text_name) {
            debug!(from = %player.free_text_name, to = %replacement, "renaming stats player");
            player.free_text_name = replacement.clone();
            renamed += 1;
        }
    }
    renamed
}

/// Clean, rename and collect the distinct free-text names to match.
///
/// Row names are rewritten in place so they stay equal to the names handed
/// to the matcher. A repeated name keeps only its first row; later rows are
/// removed from `stats`. Blank names are left out of the returned list.
pub fn prepare_stats(
    stats: &mut Vec<StatsPlayer>,
    renames: &BTreeMap<String, String>,
) -> Vec<String> {
    for player in stats.iter_mut() {
        player.free_text_name = clean_name(&player.free_text_name);
    }
    let renamed = apply_renames(stats, renames);

    let rows = stats.len();
    let mut seen = BTreeSet::new();
    stats.retain(|player| {
        if player.free_text_name.is_empty() || seen.insert(player.free_text_name.clone()) {
            return true;
        }
        warn!(name = %player.free_text_name, "dropping repeated stats row; first occurrence kept");
        false
    });

    let names: Vec<String> = stats
        .iter()
        .filter(|player| !player.free_text_name.is_empty())
        .map(|player| player.free_text_name.clone())
        .collect();
    let blank = stats.len() - names.len();
    if blank > 0 {
        warn!(blank, "stats rows without a player name will not be matched");
    }
    info!(
        rows,
        repeated = rows - stats.len(),
        names = names.len(),
        renamed,
        "prepared free-text names"
    );
    names
}
