//! Cache-aware resolution for one run.

use serde::Serialize;
use tracing::{Span, info, info_span, warn};
use xref_model::{MatchSet, MatchSummary, RunKey};

use crate::engine::{MatchOutcome, ResolutionEngine};
use crate::error::MatchError;
use crate::index::NameIndex;
use crate::repository::MatchCache;
use crate::score::Similarity;

/// Explicit context a run executes in: its key and its log span.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_key: RunKey,
    pub span: Span,
}

impl RunContext {
    pub fn new(run_key: RunKey) -> Self {
        let span = info_span!("resolve", run_key = %run_key);
        Self { run_key, span }
    }
}

/// Where a run's mapping came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionSource {
    Cache,
    Computed,
}

/// Mapping for a run plus how it was obtained.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub source: ResolutionSource,
    pub matches: MatchSet,
    pub summary: MatchSummary,
    /// Pass and tie diagnostics; only present when the engine ran.
    pub outcome: Option<MatchOutcome>,
}

/// Resolve `names` against `index`, reusing a cached mapping when one exists.
///
/// A cached entry is trusted wholesale. Otherwise the engine runs and, on
/// success only, its mapping is written back. A failed write is logged and
/// does not fail the run.
pub fn resolve<S: Similarity>(
    ctx: &RunContext,
    cache: Option<&dyn MatchCache>,
    engine: &ResolutionEngine<S>,
    names: &[String],
    index: &NameIndex,
) -> Result<Resolution, MatchError> {
    let _guard = ctx.span.enter();

    if let Some(matches) = cache.and_then(|cache| cache.get(&ctx.run_key)) {
        info!(matched = matches.len(), "using cached matches");
        let summary = matches.summary();
        return Ok(Resolution {
            source: ResolutionSource::Cache,
            matches,
            summary,
            outcome: None,
        });
    }

    let outcome = engine.resolve(names, index)?;
    if let Some(cache) = cache
        && let Err(error) = cache.put(&ctx.run_key, &outcome.matches)
    {
        warn!(%error, "failed to cache matches; continuing without a cached copy");
    }

    Ok(Resolution {
        source: ResolutionSource::Computed,
        matches: outcome.matches.clone(),
        summary: outcome.summary(),
        outcome: Some(outcome),
    })
}

#[cfg(test)]
mod tests {
    use xref_model::{MatchRecord, RosterId};

    use super::*;
    use crate::error::CacheError;
    use crate::repository::MemoryMatchCache;

    struct FailingCache;

    impl MatchCache for FailingCache {
        fn get(&self, _run_key: &RunKey) -> Option<MatchSet> {
            None
        }

        fn put(&self, _run_key: &RunKey, _matches: &MatchSet) -> Result<(), CacheError> {
            Err(CacheError::Poisoned)
        }

        fn invalidate(&self, _run_key: &RunKey) -> Result<bool, CacheError> {
            Ok(false)
        }
    }

    fn index() -> NameIndex {
        let mut index = NameIndex::new();
        index.insert(RosterId::new(1), "Harry Kane", "Kane");
        index.insert(RosterId::new(2), "Heung-Min Son", "Son");
        index
    }

    fn names() -> Vec<String> {
        vec!["Kane".to_string(), "Son".to_string()]
    }

    #[test]
    fn test_miss_computes_and_stores() {
        let ctx = RunContext::new(RunKey::new("2021_10_19").unwrap());
        let cache = MemoryMatchCache::new();
        let engine = ResolutionEngine::default();

        let resolution = resolve(&ctx, Some(&cache), &engine, &names(), &index()).unwrap();
        assert_eq!(resolution.source, ResolutionSource::Computed);
        assert_eq!(resolution.summary.matched, 2);
        assert_eq!(cache.get(&ctx.run_key), Some(resolution.matches));
    }

    #[test]
    fn test_hit_skips_engine() {
        let ctx = RunContext::new(RunKey::new("2021_10_19").unwrap());
        let cache = MemoryMatchCache::new();
        let mut cached = MatchSet::new();
        cached
            .insert(MatchRecord {
                free_text_name: "Kane".to_string(),
                roster_id: RosterId::new(99),
                confidence: 42,
            })
            .unwrap();
        cache.put(&ctx.run_key, &cached).unwrap();

        // The cached mapping wins even though the inputs disagree with it.
        let resolution = resolve(
            &ctx,
            Some(&cache),
            &ResolutionEngine::default(),
            &names(),
            &index(),
        )
        .unwrap();
        assert_eq!(resolution.source, ResolutionSource::Cache);
        assert_eq!(resolution.matches, cached);
        assert!(resolution.outcome.is_none());
    }

    #[test]
    fn test_corrupt_entry_recomputes() {
        let ctx = RunContext::new(RunKey::new("2021_10_19").unwrap());
        let cache = MemoryMatchCache::new();
        cache.insert_raw(ctx.run_key.clone(), "[{\"Kane\":").unwrap();

        let resolution = resolve(
            &ctx,
            Some(&cache),
            &ResolutionEngine::default(),
            &names(),
            &index(),
        )
        .unwrap();
        assert_eq!(resolution.source, ResolutionSource::Computed);
        assert_eq!(cache.get(&ctx.run_key), Some(resolution.matches));
    }

    #[test]
    fn test_failed_put_does_not_fail_run() {
        let ctx = RunContext::new(RunKey::new("2021_10_19").unwrap());
        let resolution = resolve(
            &ctx,
            Some(&FailingCache),
            &ResolutionEngine::default(),
            &names(),
            &index(),
        )
        .unwrap();
        assert_eq!(resolution.summary.matched, 2);
    }

    #[test]
    fn test_failed_run_leaves_cache_untouched() {
        let ctx = RunContext::new(RunKey::new("2021_10_19").unwrap());
        let cache = MemoryMatchCache::new();
        let mut names = names();
        names.push("Salah".to_string());

        let err = resolve(
            &ctx,
            Some(&cache),
            &ResolutionEngine::default(),
            &names,
            &index(),
        )
        .unwrap_err();
        assert!(matches!(err, MatchError::UnresolvableSurplus { .. }));
        assert!(cache.is_empty());
    }
}
