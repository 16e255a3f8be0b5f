//! Greedy resolution under a relaxing confidence threshold.
//!
//! Each pass walks the still-unmatched free-text names in sequence order and
//! gives every name its best still-available roster candidate, provided the
//! score clears the pass threshold. Assignments for a pass are collected
//! first and applied to the pools afterwards. The threshold then drops by a
//! fixed step and the next pass begins, so strong matches are always taken
//! before weaker ones get a chance.
//!
//! Multi-token names are compared against full canonical names while the
//! threshold is high, and against short names (with the exact-match
//! override) once it has decayed. Single-token names always use short names.

use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, trace, warn};
use xref_model::{MatchOptions, MatchRecord, MatchSet, MatchSummary, RosterId};

use crate::error::MatchError;
use crate::index::NameIndex;
use crate::score::{PartialRatio, Similarity};
use crate::utils::{dedupe_names, token_count};

/// Which canonical form a free-text name is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NameView {
    /// Canonical full names, fuzzy score only.
    Full,
    /// Canonical short names, exact-match override then fuzzy score.
    Short,
}

/// A scored roster entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub roster_id: RosterId,
    pub score: u8,
}

/// Candidate order: higher score first, then lower roster id.
pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.roster_id.cmp(&b.roster_id))
}

/// Several roster entries shared the winning score for one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmbiguousTie {
    pub free_text_name: String,
    pub score: u8,
    pub chosen: RosterId,
    /// The other candidates at the same score, in ascending id order.
    pub tied: Vec<RosterId>,
}

/// What happened in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// 1-based pass number.
    pub pass: u32,
    /// Threshold applied during the pass.
    pub threshold: i32,
    pub committed: usize,
    /// Names still unmatched after the pass.
    pub remaining: usize,
}

/// Result of a successful resolution run.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    pub matches: MatchSet,
    pub passes: Vec<PassReport>,
    pub ties: Vec<AmbiguousTie>,
}

impl MatchOutcome {
    pub fn summary(&self) -> MatchSummary {
        self.matches.summary()
    }
}

/// Threshold-relaxation matcher.
#[derive(Debug, Clone)]
pub struct ResolutionEngine<S = PartialRatio> {
    scorer: S,
    options: MatchOptions,
}

impl Default for ResolutionEngine<PartialRatio> {
    fn default() -> Self {
        Self::new(MatchOptions::default())
    }
}

impl ResolutionEngine<PartialRatio> {
    pub fn new(options: MatchOptions) -> Self {
        Self::with_scorer(PartialRatio, options)
    }
}

impl<S: Similarity> ResolutionEngine<S> {
    pub fn with_scorer(scorer: S, options: MatchOptions) -> Self {
        Self { scorer, options }
    }

    /// Match every free-text name to a distinct roster entry of `index`.
    ///
    /// Blank and repeated names are skipped. The index itself is left
    /// untouched; the run works on its own copy of the pool.
    ///
    /// # Errors
    ///
    /// [`MatchError::UnresolvableSurplus`] when the pool runs out first, and
    /// [`MatchError::PassLimitExceeded`] when the pass cap is hit. Both carry
    /// the matches committed so far.
    pub fn resolve(&self, names: &[String], index: &NameIndex) -> Result<MatchOutcome, MatchError> {
        self.validate()?;

        let mut pending: Vec<PendingName> = dedupe_names(names)
            .into_iter()
            .map(PendingName::new)
            .collect();
        let mut pool = index.clone();
        let mut outcome = MatchOutcome::default();
        let mut threshold = i32::from(self.options.start_threshold);
        let mut pass: u32 = 0;

        info!(
            names = pending.len(),
            canonical = pool.len(),
            "starting name resolution"
        );

        while !pending.is_empty() {
            if pool.is_empty() {
                let unmatched = unmatched_names(&pending);
                warn!(
                    unmatched = unmatched.len(),
                    matched = outcome.matches.len(),
                    "canonical pool exhausted before all names were matched"
                );
                return Err(MatchError::UnresolvableSurplus {
                    unmatched,
                    partial: outcome.matches,
                });
            }
            if pass >= self.options.max_passes {
                return Err(MatchError::PassLimitExceeded {
                    passes: pass,
                    unmatched: unmatched_names(&pending),
                    partial: outcome.matches,
                });
            }
            pass += 1;

            // The last permitted pass accepts any score.
            let effective = if pass == self.options.max_passes {
                threshold.min(0)
            } else {
                threshold
            };

            let commits = self.run_pass(&pending, &pool, effective, &mut outcome.ties);

            let mut committed = BTreeSet::new();
            for (position, record) in commits {
                trace!(
                    name = %record.free_text_name,
                    roster_id = %record.roster_id,
                    confidence = record.confidence,
                    "committed match"
                );
                pool.remove(record.roster_id);
                outcome.matches.insert(record)?;
                committed.insert(position);
            }
            pending = pending
                .into_iter()
                .enumerate()
                .filter(|(position, _)| !committed.contains(position))
                .map(|(_, name)| name)
                .collect();

            debug!(
                pass,
                threshold = effective,
                committed = committed.len(),
                remaining = pending.len(),
                "pass complete"
            );
            outcome.passes.push(PassReport {
                pass,
                threshold: effective,
                committed: committed.len(),
                remaining: pending.len(),
            });
            threshold -= i32::from(self.options.threshold_step);
        }

        let summary = outcome.summary();
        if let Some(mean) = summary.mean_confidence {
            info!(
                "{} players matched with a mean confidence score of {:.2}",
                summary.matched, mean
            );
        }
        if let Some(min) = summary.min_confidence {
            info!("least confident match has a confidence of {}", min);
        }
        Ok(outcome)
    }

    fn validate(&self) -> Result<(), MatchError> {
        if self.options.threshold_step == 0 {
            return Err(MatchError::InvalidOptions(
                "threshold_step must be at least 1".to_string(),
            ));
        }
        if self.options.max_passes == 0 {
            return Err(MatchError::InvalidOptions(
                "max_passes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Pick winners for one pass without touching the pools.
    ///
    /// Returns `(position in pending, record)` pairs in sequence order.
    fn run_pass(
        &self,
        pending: &[PendingName],
        pool: &NameIndex,
        threshold: i32,
        ties: &mut Vec<AmbiguousTie>,
    ) -> Vec<(usize, MatchRecord)> {
        let mut claimed = BTreeSet::new();
        let mut commits = Vec::new();

        for (position, name) in pending.iter().enumerate() {
            let view = if name.multi_token
                && threshold > i32::from(self.options.multi_token_threshold)
            {
                NameView::Full
            } else {
                NameView::Short
            };

            let mut available = name
                .candidates(view, &self.scorer, pool)
                .iter()
                .filter(|c| pool.contains(c.roster_id) && !claimed.contains(&c.roster_id));
            let Some(best) = available.next().copied() else {
                continue;
            };
            if i32::from(best.score) < threshold {
                continue;
            }

            let tied: Vec<RosterId> = available
                .take_while(|c| c.score == best.score)
                .map(|c| c.roster_id)
                .collect();
            if !tied.is_empty() {
                warn!(
                    name = %name.name,
                    score = best.score,
                    chosen = %best.roster_id,
                    tied = tied.len(),
                    "ambiguous tie at the winning score; lowest roster id chosen"
                );
                ties.push(AmbiguousTie {
                    free_text_name: name.name.clone(),
                    score: best.score,
                    chosen: best.roster_id,
                    tied,
                });
            }

            claimed.insert(best.roster_id);
            commits.push((
                position,
                MatchRecord {
                    free_text_name: name.name.clone(),
                    roster_id: best.roster_id,
                    confidence: best.score,
                },
            ));
        }
        commits
    }
}

/// A free-text name awaiting a match, with its ranked candidates per view.
///
/// Scores never change during a run and the pool only shrinks, so each view
/// is ranked once against the pool as it stood at first use and filtered
/// for availability afterwards.
struct PendingName {
    name: String,
    multi_token: bool,
    full: OnceCell<Vec<Candidate>>,
    short: OnceCell<Vec<Candidate>>,
}

impl PendingName {
    fn new(name: String) -> Self {
        let multi_token = token_count(&name) > 1;
        Self {
            name,
            multi_token,
            full: OnceCell::new(),
            short: OnceCell::new(),
        }
    }

    fn candidates<S: Similarity>(
        &self,
        view: NameView,
        scorer: &S,
        pool: &NameIndex,
    ) -> &[Candidate] {
        match view {
            NameView::Full => self.full.get_or_init(|| {
                rank(pool.full_names().map(|(roster_id, full)| Candidate {
                    roster_id,
                    score: scorer.fuzzy(&self.name, full),
                }))
            }),
            NameView::Short => self.short.get_or_init(|| {
                rank(pool.short_names().map(|(roster_id, short)| Candidate {
                    roster_id,
                    score: scorer.exact_or_fuzzy(&self.name, short),
                }))
            }),
        }
    }
}

fn rank(candidates: impl Iterator<Item = Candidate>) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = candidates.collect();
    ranked.sort_by(compare_candidates);
    ranked
}

fn unmatched_names(pending: &[PendingName]) -> Vec<String> {
    pending.iter().map(|p| p.name.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_orders_by_score_then_id() {
        let mut candidates = vec![
            Candidate {
                roster_id: RosterId::new(5),
                score: 90,
            },
            Candidate {
                roster_id: RosterId::new(2),
                score: 90,
            },
            Candidate {
                roster_id: RosterId::new(1),
                score: 40,
            },
            Candidate {
                roster_id: RosterId::new(9),
                score: 150,
            },
        ];
        candidates.sort_by(compare_candidates);
        let ids: Vec<u32> = candidates.iter().map(|c| c.roster_id.get()).collect();
        assert_eq!(ids, vec![9, 2, 5, 1]);
    }

    #[test]
    fn test_zero_step_is_rejected() {
        let engine = ResolutionEngine::new(MatchOptions {
            threshold_step: 0,
            ..MatchOptions::default()
        });
        let err = engine
            .resolve(&["Son".to_string()], &NameIndex::new())
            .unwrap_err();
        assert!(matches!(err, MatchError::InvalidOptions(_)));
    }

    #[test]
    fn test_empty_name_list_needs_no_passes() {
        let outcome = ResolutionEngine::default()
            .resolve(&[], &NameIndex::new())
            .unwrap();
        assert!(outcome.matches.is_empty());
        assert!(outcome.passes.is_empty());
    }

    #[test]
    fn test_name_keeps_first_ranking_as_pool_shrinks() {
        let mut pool = NameIndex::new();
        pool.insert(RosterId::new(1), "Harry Kane", "Kane");
        pool.insert(RosterId::new(2), "Martin Kelly", "Kelly");
        let name = PendingName::new("Kane".to_string());

        let first = name
            .candidates(NameView::Short, &PartialRatio, &pool)
            .to_vec();
        pool.remove(RosterId::new(1));
        let second = name.candidates(NameView::Short, &PartialRatio, &pool);

        assert_eq!(first, second);
        assert_eq!(first[0].roster_id, RosterId::new(1));
        assert_eq!(first[0].score, 150);
    }
}
