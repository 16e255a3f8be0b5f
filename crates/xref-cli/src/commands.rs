use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tracing::info;

use xref_cli::pipeline::{invalidate_cache, load_options, run_pipeline, run_resolve};
use xref_cli::types::{ExportFormats, PipelineConfig, ResolveResult, RunResult};
use xref_ingest::latest_run_key;
use xref_model::RunKey;

use crate::cli::{InvalidateArgs, OutputFormatArg, ResolveArgs, RunArgs, SourceArgs};

pub fn run(args: &RunArgs) -> Result<RunResult> {
    let mut config = pipeline_config(&args.source)?;
    if let Some(min_minutes) = args.min_minutes {
        config.options.prune.min_minutes = min_minutes;
    }
    if args.remove_injured {
        config.options.prune.remove_injured = true;
    }
    config.output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.source.data_dir.clone());
    config.formats = export_formats(args.format);
    run_pipeline(&config)
}

pub fn resolve(args: &ResolveArgs) -> Result<ResolveResult> {
    let config = pipeline_config(&args.source)?;
    run_resolve(&config)
}

pub fn invalidate(args: &InvalidateArgs) -> Result<bool> {
    let run_key = RunKey::new(args.run_key.clone()).context("parse run key")?;
    let removed = invalidate_cache(&args.cache_dir, &run_key)?;
    if removed {
        info!(run_key = %run_key, "cached mapping removed");
    }
    Ok(removed)
}

fn pipeline_config(source: &SourceArgs) -> Result<PipelineConfig> {
    let options = load_options(source.config.as_deref())?;
    let run_key = select_run_key(source)?;
    let cache_dir = if source.no_cache {
        None
    } else {
        Some(
            source
                .cache_dir
                .clone()
                .unwrap_or_else(|| source.data_dir.clone()),
        )
    };
    Ok(PipelineConfig {
        data_dir: source.data_dir.clone(),
        run_key,
        cache_dir,
        output_dir: source.data_dir.clone(),
        formats: ExportFormats::BOTH,
        options,
    })
}

/// The run key is fixed here, once, and passed down explicitly.
fn select_run_key(source: &SourceArgs) -> Result<RunKey> {
    if let Some(value) = &source.run_key {
        return RunKey::new(value.clone()).context("parse run key");
    }
    if source.latest {
        return latest_run_key(&source.data_dir)
            .context("scan data directory for run keys")?
            .ok_or_else(|| {
                anyhow!(
                    "no roster snapshots found in {}",
                    source.data_dir.display()
                )
            });
    }
    Ok(RunKey::from_date(Local::now().date_naive()))
}

fn export_formats(format: OutputFormatArg) -> ExportFormats {
    match format {
        OutputFormatArg::Json => ExportFormats {
            json: true,
            csv: false,
        },
        OutputFormatArg::Csv => ExportFormats {
            json: false,
            csv: true,
        },
        OutputFormatArg::Both => ExportFormats::BOTH,
    }
}
