//! Similarity scoring between free-text and canonical names.
//!
//! The fuzzy metric is a partial ratio: the shorter string is slid across
//! the longer one and each equal-length window is scored by Indel
//! similarity (the normalized longest-common-subsequence ratio). The best
//! window wins, so `"Smith"` scores 100 against `"Smithson"`.
//!
//! On top of that, an exact match of the normalized strings scores
//! [`EXACT_MATCH_SCORE`], which sits outside `0..=100` so it outranks any
//! fuzzy score at every threshold.

use rapidfuzz::distance::indel;

use crate::utils::normalize_name;

/// Score returned for normalized-identical strings.
pub const EXACT_MATCH_SCORE: u8 = 150;

/// A deterministic string similarity.
pub trait Similarity {
    /// Fuzzy similarity in `0..=100`.
    fn fuzzy(&self, a: &str, b: &str) -> u8;

    /// [`EXACT_MATCH_SCORE`] for normalized-identical strings, otherwise [`Self::fuzzy`].
    fn exact_or_fuzzy(&self, a: &str, b: &str) -> u8 {
        if normalize_name(a) == normalize_name(b) {
            EXACT_MATCH_SCORE
        } else {
            self.fuzzy(a, b)
        }
    }
}

/// Partial-ratio similarity backed by Indel distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialRatio;

impl Similarity for PartialRatio {
    fn fuzzy(&self, a: &str, b: &str) -> u8 {
        partial_ratio(a, b)
    }
}

/// Best-aligned substring similarity of two names, `0..=100`.
///
/// Both names are normalized first. An empty side scores 0.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = normalize_name(a).chars().collect();
    let b: Vec<char> = normalize_name(b).chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if shorter.is_empty() {
        return 0;
    }

    let mut best = 0.0_f64;
    for window in longer.windows(shorter.len()) {
        let similarity =
            indel::normalized_similarity(shorter.iter().copied(), window.iter().copied());
        if similarity > best {
            best = similarity;
            if best >= 1.0 {
                break;
            }
        }
    }
    to_percent(best)
}

/// Score with the exact-match override, using [`PartialRatio`].
pub fn score(a: &str, b: &str) -> u8 {
    PartialRatio.exact_or_fuzzy(a, b)
}

fn to_percent(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}
