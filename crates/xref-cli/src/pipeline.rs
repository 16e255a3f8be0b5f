//! Cross-reference pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the roster and stats snapshots for the run key
//! 2. **Resolve**: clean names, build the name index, match (or reuse the cache)
//! 3. **Merge**: inner-join stats onto roster players by roster id
//! 4. **Prune**: drop inactive and unavailable players
//! 5. **Output**: flatten and write the joined dataset
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info_span};

use xref_ingest::{Snapshot, load_snapshot};
use xref_map::{FileMatchCache, MatchCache, NameIndex, ResolutionEngine, RunContext, resolve};
use xref_model::{PipelineOptions, RunKey};
use xref_transform::{
    FlatRecord, joined_data_path, merge, prepare_stats, prune, write_csv, write_json,
};

use crate::types::{ExportFormats, PipelineConfig, ResolveResult, RunResult};

/// Read pipeline options from a JSON file, or use defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<PipelineOptions> {
    let Some(path) = path else {
        return Ok(PipelineOptions::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parse config file {}", path.display()))
}

// ============================================================================
// Stage 1: Ingest
// ============================================================================

pub fn ingest(data_dir: &Path, run_key: &RunKey) -> Result<Snapshot> {
    let start = Instant::now();
    let snapshot = load_snapshot(data_dir, run_key)
        .with_context(|| format!("load snapshots for run {run_key}"))?;
    debug!(elapsed_ms = start.elapsed().as_millis(), "ingest complete");
    Ok(snapshot)
}

// ============================================================================
// Stage 2: Resolve
// ============================================================================

/// Match the snapshot's free-text names to roster ids.
///
/// Stats rows are cleaned and renamed in place so they join on the same
/// names that were matched.
pub fn resolve_stage(config: &PipelineConfig, snapshot: &mut Snapshot) -> Result<ResolveResult> {
    let start = Instant::now();
    let names = prepare_stats(&mut snapshot.stats, &config.options.renames);
    let index = NameIndex::from_roster(&snapshot.roster);

    let cache = config
        .cache_dir
        .as_ref()
        .map(|dir| {
            FileMatchCache::new(dir)
                .with_context(|| format!("open match cache at {}", dir.display()))
        })
        .transpose()?;
    let engine = ResolutionEngine::new(config.options.matching);
    let ctx = RunContext::new(config.run_key.clone());

    let resolution = resolve(
        &ctx,
        cache.as_ref().map(|cache| cache as &dyn MatchCache),
        &engine,
        &names,
        &index,
    )
    .context("resolve player names")?;
    debug!(elapsed_ms = start.elapsed().as_millis(), "resolve complete");

    let roster_names = snapshot
        .roster
        .iter()
        .map(|player| (player.id, player.full_name()))
        .collect::<BTreeMap<_, _>>();

    Ok(ResolveResult {
        run_key: config.run_key.clone(),
        roster_players: snapshot.roster.len(),
        canonical: index.len(),
        stats_rows: snapshot.stats.len(),
        names,
        roster_names,
        resolution,
    })
}

/// Ingest and resolve only, without merging or writing outputs.
pub fn run_resolve(config: &PipelineConfig) -> Result<ResolveResult> {
    let span = info_span!("run", run_key = %config.run_key);
    let _guard = span.enter();
    let mut snapshot = ingest(&config.data_dir, &config.run_key)?;
    resolve_stage(config, &mut snapshot)
}

// ============================================================================
// Stage 5: Output
// ============================================================================

pub fn output(
    output_dir: &Path,
    run_key: &RunKey,
    formats: ExportFormats,
    records: &[FlatRecord],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if formats.json {
        let path = joined_data_path(output_dir, run_key, "json");
        write_json(&path, records).context("write joined JSON")?;
        written.push(path);
    }
    if formats.csv {
        let path = joined_data_path(output_dir, run_key, "csv");
        write_csv(&path, records).context("write joined CSV")?;
        written.push(path);
    }
    Ok(written)
}

/// Run every stage for one run key.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunResult> {
    let span = info_span!("run", run_key = %config.run_key);
    let _guard = span.enter();

    let mut snapshot = ingest(&config.data_dir, &config.run_key)?;
    let resolve = resolve_stage(config, &mut snapshot)?;

    // Stage 3: Merge
    let merged = merge(&snapshot.roster, &snapshot.stats, &resolve.resolution.matches)
        .context("merge roster and stats")?;

    // Stage 4: Prune
    let (players, prune_report) = prune(merged.players, &config.options.prune);

    let records: Vec<FlatRecord> = players
        .iter()
        .map(|player| player.to_flat_record(&config.options.merge))
        .collect();
    let outputs = output(&config.output_dir, &config.run_key, config.formats, &records)?;

    Ok(RunResult {
        resolve,
        merge: merged.report,
        prune: prune_report,
        records: records.len(),
        outputs,
    })
}

/// Delete the cached mapping for a run. Returns whether one existed.
pub fn invalidate_cache(cache_dir: &Path, run_key: &RunKey) -> Result<bool> {
    let cache = FileMatchCache::new(cache_dir)
        .with_context(|| format!("open match cache at {}", cache_dir.display()))?;
    cache
        .invalidate(run_key)
        .with_context(|| format!("invalidate cached matches for run {run_key}"))
}
