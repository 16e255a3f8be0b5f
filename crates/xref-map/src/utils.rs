use std::collections::BTreeSet;

use tracing::warn;

/// Lowercase and collapse runs of whitespace to single spaces.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of whitespace-separated tokens in a name.
pub fn token_count(raw: &str) -> usize {
    raw.split_whitespace().count()
}

/// Drop blank names and repeated names, keeping first occurrences in order.
pub fn dedupe_names(names: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        if name.trim().is_empty() {
            warn!("skipping blank free-text name");
            continue;
        }
        if !seen.insert(name.as_str()) {
            warn!(name = %name, "duplicate free-text name; only the first is matched");
            continue;
        }
        out.push(name.clone());
    }
    out
}
