//! Integration tests for the pipeline module.

use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tempfile::TempDir;

use xref_cli::pipeline::{invalidate_cache, load_options, run_pipeline, run_resolve};
use xref_cli::types::{ExportFormats, PipelineConfig};
use xref_map::{MatchError, ResolutionSource};
use xref_model::{PipelineOptions, RosterId, RunKey};

const RUN_KEY: &str = "2021_10_19";

fn roster_element(id: u32, first: &str, second: &str, web: &str, minutes: u32) -> Value {
    json!({
        "id": id,
        "first_name": first,
        "second_name": second,
        "web_name": web,
        "minutes": minutes,
        "element_type": 4,
        "team": 17,
        "chance_of_playing_next_round": null,
        "news": "",
        "goals_scored": 3,
        "ict_index": "40.2"
    })
}

fn write_snapshots(dir: &Path, stats: &Value) {
    let roster = json!({
        "elements": [
            roster_element(1, "Harry", "Kane", "Kane", 810),
            roster_element(2, "Heung-Min", "Son", "Son", 900),
            roster_element(3, "Lucas", "Rodrigues Moura da Silva", "Lucas Moura", 450),
            roster_element(4, "Pierluigi", "Gollini", "Gollini", 0),
        ]
    });
    fs::write(dir.join(format!("{RUN_KEY}_roster.json")), roster.to_string()).unwrap();
    fs::write(dir.join(format!("{RUN_KEY}_stats.json")), stats.to_string()).unwrap();
}

fn default_stats() -> Value {
    json!([
        { "player_name": "Harry Kane", "xG": "3.12", "goals_scored": "2" },
        { "player_name": "Son  Heung-Min", "xG": "2.40" },
        { "player_name": "Lucas Moura", "xG": "1.05" }
    ])
}

fn config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        data_dir: dir.to_path_buf(),
        run_key: RunKey::new(RUN_KEY).unwrap(),
        cache_dir: Some(dir.join("cache")),
        output_dir: dir.join("out"),
        formats: ExportFormats::BOTH,
        options: PipelineOptions::default(),
    }
}

#[test]
fn test_full_run_writes_joined_data_and_cache() {
    let dir = TempDir::new().unwrap();
    write_snapshots(dir.path(), &default_stats());
    let config = config(dir.path());

    let result = run_pipeline(&config).unwrap();

    assert_eq!(result.resolve.resolution.source, ResolutionSource::Computed);
    assert_eq!(result.resolve.canonical, 3);
    let matches = &result.resolve.resolution.matches;
    assert_eq!(matches.roster_id("Harry Kane"), Some(RosterId::new(1)));
    assert_eq!(matches.roster_id("Son Heung-Min"), Some(RosterId::new(2)));
    assert_eq!(matches.roster_id("Lucas Moura"), Some(RosterId::new(3)));
    assert_eq!(result.records, 3);
    assert_eq!(result.outputs.len(), 2);
    assert!(dir.path().join("cache/2021_10_19_player_matching.json").is_file());

    let json_path = dir.path().join("out/2021_10_19_joined_data.json");
    let records: Value = serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
    let first = &records[0];
    assert_eq!(first["id"], json!(1));
    assert_eq!(first["player_name"], json!("Harry Kane"));
    assert_eq!(first["xG"], json!(3.12));
    assert_eq!(first["ict_index"], json!(40.2));
    assert_eq!(first["goals_scored_stats"], json!(2));

    let csv = fs::read_to_string(dir.path().join("out/2021_10_19_joined_data.csv")).unwrap();
    insta::assert_snapshot!(csv.lines().next().unwrap(), @"goals_scored,goals_scored_stats,ict_index,id,minutes,player_name,position,team,web_name,xG");
}

#[test]
fn test_second_run_reuses_cached_mapping() {
    let dir = TempDir::new().unwrap();
    write_snapshots(dir.path(), &default_stats());
    let config = config(dir.path());

    let first = run_resolve(&config).unwrap();
    let second = run_resolve(&config).unwrap();

    assert_eq!(second.resolution.source, ResolutionSource::Cache);
    assert!(second.resolution.outcome.is_none());
    assert_eq!(second.resolution.matches, first.resolution.matches);
}

#[test]
fn test_invalidate_forces_recomputation() {
    let dir = TempDir::new().unwrap();
    write_snapshots(dir.path(), &default_stats());
    let config = config(dir.path());
    run_resolve(&config).unwrap();

    let cache_dir = dir.path().join("cache");
    assert!(invalidate_cache(&cache_dir, &config.run_key).unwrap());
    assert!(!invalidate_cache(&cache_dir, &config.run_key).unwrap());

    let rerun = run_resolve(&config).unwrap();
    assert_eq!(rerun.resolution.source, ResolutionSource::Computed);
}

#[test]
fn test_surplus_names_fail_with_partial_matches() {
    let dir = TempDir::new().unwrap();
    let stats = json!([
        { "player_name": "Harry Kane" },
        { "player_name": "Son Heung-Min" },
        { "player_name": "Lucas Moura" },
        { "player_name": "Dele Alli" }
    ]);
    write_snapshots(dir.path(), &stats);
    let config = config(dir.path());

    let error = run_pipeline(&config).unwrap_err();
    let match_error = error.downcast_ref::<MatchError>().expect("match error");
    assert_eq!(match_error.unmatched().len(), 1);
    assert_eq!(match_error.partial().unwrap().len(), 3);
    assert!(!dir.path().join("cache/2021_10_19_player_matching.json").exists());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_repeated_stats_name_keeps_first_row_and_finishes() {
    let dir = TempDir::new().unwrap();
    let stats = json!([
        { "player_name": "Harry Kane", "xG": "3.12" },
        { "player_name": "Son Heung-Min", "xG": "2.40" },
        { "player_name": "Harry  Kane ", "xG": "0.00" }
    ]);
    write_snapshots(dir.path(), &stats);

    let result = run_pipeline(&config(dir.path())).unwrap();

    assert_eq!(result.resolve.names, vec!["Harry Kane", "Son Heung-Min"]);
    assert_eq!(result.resolve.stats_rows, 2);
    assert_eq!(result.merge.joined, 2);
    assert!(result.merge.issues.is_empty());
    assert_eq!(result.records, 2);

    let json_path = dir.path().join("out/2021_10_19_joined_data.json");
    let records: Value = serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(records[0]["player_name"], json!("Harry Kane"));
    assert_eq!(records[0]["xG"], json!(3.12));
}

#[test]
fn test_renames_and_pruning_from_config() {
    let dir = TempDir::new().unwrap();
    let stats = json!([
        { "player_name": "Harry Kane" },
        { "player_name": "Sonny" },
        { "player_name": "Lucas Moura" }
    ]);
    write_snapshots(dir.path(), &stats);
    let config_path = dir.path().join("options.json");
    fs::write(
        &config_path,
        r#"{ "renames": { "Sonny": "Son" }, "prune": { "min_minutes": 500 } }"#,
    )
    .unwrap();

    let mut config = config(dir.path());
    config.cache_dir = None;
    config.formats = ExportFormats {
        json: true,
        csv: false,
    };
    config.options = load_options(Some(&config_path)).unwrap();
    assert_eq!(config.options.matching.start_threshold, 100);

    let result = run_pipeline(&config).unwrap();
    let matches = &result.resolve.resolution.matches;
    assert_eq!(matches.roster_id("Son"), Some(RosterId::new(2)));
    assert_eq!(matches.confidence("Son"), Some(150));
    assert_eq!(result.prune.below_min_minutes, 1);
    assert_eq!(result.records, 2);
    assert_eq!(result.outputs.len(), 1);
    assert!(!dir.path().join("cache").exists());
}

#[test]
fn test_non_integer_roster_id_fails_before_matching() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(format!("{RUN_KEY}_roster.json")),
        json!([{ "id": "seven", "first_name": "A", "second_name": "B", "web_name": "B", "minutes": 90 }])
            .to_string(),
    )
    .unwrap();
    fs::write(
        dir.path().join(format!("{RUN_KEY}_stats.json")),
        default_stats().to_string(),
    )
    .unwrap();

    let error = run_resolve(&config(dir.path())).unwrap_err();
    assert!(
        error
            .downcast_ref::<xref_ingest::IngestError>()
            .is_some_and(|e| matches!(e, xref_ingest::IngestError::InvalidIdentifier { .. })),
        "unexpected error: {error:#}"
    );
}
