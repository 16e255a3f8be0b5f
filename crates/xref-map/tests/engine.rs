use proptest::prelude::*;
use xref_map::{EXACT_MATCH_SCORE, MatchError, NameIndex, ResolutionEngine};
use xref_model::{MatchOptions, RosterId};

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn index(entries: &[(u32, &str, &str)]) -> NameIndex {
    let mut index = NameIndex::new();
    for (id, full, short) in entries {
        index.insert(RosterId::new(*id), *full, *short);
    }
    index
}

#[test]
fn exact_short_name_beats_longer_lookalike() {
    let index = index(&[(1, "Tom Smithson", "Smithson"), (2, "Adam Smith", "Smith")]);
    let outcome = ResolutionEngine::default()
        .resolve(&names(&["Smith"]), &index)
        .unwrap();

    assert_eq!(outcome.matches.roster_id("Smith"), Some(RosterId::new(2)));
    assert_eq!(outcome.matches.confidence("Smith"), Some(EXACT_MATCH_SCORE));
    assert_eq!(outcome.passes.len(), 1);
}

#[test]
fn multi_token_name_uses_full_names_while_threshold_is_high() {
    // Entry 1's short name is an exact lookalike, but multi-token names only
    // see full names until the threshold decays to 70.
    let index = index(&[
        (1, "Zz Qq", "Kevin De Bruyne"),
        (2, "Kevin Bruyne Dee", "Bruyne"),
    ]);
    let outcome = ResolutionEngine::default()
        .resolve(&names(&["Kevin De Bruyne"]), &index)
        .unwrap();

    assert_eq!(
        outcome.matches.roster_id("Kevin De Bruyne"),
        Some(RosterId::new(2))
    );
    let confidence = outcome.matches.confidence("Kevin De Bruyne").unwrap();
    assert_eq!(confidence, 80);
    assert_eq!(outcome.passes.last().unwrap().threshold, 80);
}

#[test]
fn multi_token_name_falls_back_to_short_names_at_seventy() {
    let index = index(&[(1, "Zz Qq", "Kevin De Bruyne")]);
    let outcome = ResolutionEngine::default()
        .resolve(&names(&["Kevin De Bruyne"]), &index)
        .unwrap();

    assert_eq!(
        outcome.matches.confidence("Kevin De Bruyne"),
        Some(EXACT_MATCH_SCORE)
    );
    assert_eq!(outcome.passes.len(), 16);
    assert_eq!(outcome.passes.last().unwrap().threshold, 70);
    assert!(outcome.passes[..15].iter().all(|p| p.committed == 0));
}

#[test]
fn surplus_reports_unmatched_and_partial_matches() {
    let index = index(&[(1, "Harry Kane", "Kane"), (2, "Heung-Min Son", "Son")]);
    let err = ResolutionEngine::default()
        .resolve(&names(&["Son", "Kane", "Salah"]), &index)
        .unwrap_err();

    match err {
        MatchError::UnresolvableSurplus { unmatched, partial } => {
            assert_eq!(unmatched, vec!["Salah".to_string()]);
            assert_eq!(partial.len(), 2);
            assert_eq!(partial.roster_id("Son"), Some(RosterId::new(2)));
            assert_eq!(partial.roster_id("Kane"), Some(RosterId::new(1)));
        }
        other => panic!("expected surplus error, got {other:?}"),
    }
}

#[test]
fn empty_pool_fails_without_scoring() {
    let err = ResolutionEngine::default()
        .resolve(&names(&["Son"]), &NameIndex::new())
        .unwrap_err();
    assert_eq!(err.unmatched(), &["Son".to_string()]);
    assert!(err.partial().unwrap().is_empty());
}

#[test]
fn ties_go_to_lowest_roster_id() {
    let index = index(&[(8, "Adam Smith", "Smith"), (4, "Brandon Smith", "Smith")]);
    let outcome = ResolutionEngine::default()
        .resolve(&names(&["Smith"]), &index)
        .unwrap();

    assert_eq!(outcome.matches.roster_id("Smith"), Some(RosterId::new(4)));
    assert_eq!(outcome.ties.len(), 1);
    assert_eq!(outcome.ties[0].chosen, RosterId::new(4));
    assert_eq!(outcome.ties[0].tied, vec![RosterId::new(8)]);
}

#[test]
fn earlier_names_claim_contested_entries_first() {
    let index = index(&[(1, "Harry Kane", "Kane"), (2, "N'Golo Kante", "Kante")]);
    let outcome = ResolutionEngine::default()
        .resolve(&names(&["Kane", "Kan"]), &index)
        .unwrap();

    assert_eq!(outcome.matches.roster_id("Kane"), Some(RosterId::new(1)));
    assert_eq!(outcome.matches.roster_id("Kan"), Some(RosterId::new(2)));
    assert_eq!(outcome.passes.len(), 1);
}

#[test]
fn resolve_leaves_index_untouched() {
    let index = index(&[(1, "Harry Kane", "Kane"), (2, "Heung-Min Son", "Son")]);
    let before = index.clone();
    ResolutionEngine::default()
        .resolve(&names(&["Kane"]), &index)
        .unwrap();
    assert_eq!(index, before);
}

#[test]
fn single_pass_cap_accepts_any_score() {
    let engine = ResolutionEngine::new(MatchOptions {
        max_passes: 1,
        ..MatchOptions::default()
    });
    let index = index(&[(1, "Harry Kane", "Kane"), (2, "Heung-Min Son", "Son")]);
    let outcome = engine
        .resolve(&names(&["Sonny", "Qqq"]), &index)
        .unwrap();

    assert_eq!(outcome.matches.len(), 2);
    assert_eq!(outcome.passes.len(), 1);
    assert_eq!(outcome.passes[0].threshold, 0);
}

#[test]
fn duplicate_and_blank_names_are_skipped() {
    let index = index(&[(1, "Harry Kane", "Kane"), (2, "Heung-Min Son", "Son")]);
    let outcome = ResolutionEngine::default()
        .resolve(&names(&["Kane", " ", "Kane"]), &index)
        .unwrap();
    assert_eq!(outcome.matches.len(), 1);
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}( [a-z]{2,8})?"
}

proptest! {
    #[test]
    fn roster_surplus_always_resolves_one_to_one(
        free_text in prop::collection::vec(name_strategy(), 0..8),
        extra in prop::collection::vec((name_strategy(), name_strategy()), 0..4),
    ) {
        let mut pool = NameIndex::new();
        let mut next_id = 1u32;
        for name in &free_text {
            // Give every free-text name some roster entry to compete for.
            pool.insert(RosterId::new(next_id), format!("{name} x"), name.clone());
            next_id += 1;
        }
        for (full, short) in &extra {
            pool.insert(RosterId::new(next_id), full.clone(), short.clone());
            next_id += 1;
        }

        let outcome = ResolutionEngine::default().resolve(&free_text, &pool).unwrap();

        let distinct: std::collections::BTreeSet<_> = free_text.iter().collect();
        prop_assert_eq!(outcome.matches.len(), distinct.len());
        prop_assert!(outcome.passes.len() <= 50);

        let ids: std::collections::BTreeSet<_> =
            outcome.matches.mapping().values().copied().collect();
        prop_assert_eq!(ids.len(), outcome.matches.len());
        prop_assert!(ids.iter().all(|id| pool.contains(*id)));
    }

    #[test]
    fn resolution_is_deterministic(
        free_text in prop::collection::vec(name_strategy(), 0..6),
        roster in prop::collection::vec((name_strategy(), name_strategy()), 6..10),
    ) {
        let mut pool = NameIndex::new();
        for (id, (full, short)) in roster.iter().enumerate() {
            pool.insert(RosterId::new(id as u32 + 1), full.clone(), short.clone());
        }

        let engine = ResolutionEngine::default();
        let first = engine.resolve(&free_text, &pool).unwrap();
        let second = engine.resolve(&free_text, &pool).unwrap();
        prop_assert_eq!(first.matches, second.matches);
        prop_assert_eq!(first.passes, second.passes);
    }
}
