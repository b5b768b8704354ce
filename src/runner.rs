// src/runner.rs
use std::{fs, path::PathBuf};

use tracing::{info, info_span, warn};

use crate::{
    config::consts::{RAW_KTC_FILE, RAW_SLEEPER_FILE},
    config::options::AppOptions,
    core::net::PageFetcher,
    error::{Error, Provider, Result},
    file, merge,
    progress::{NullProgress, Progress, Stage},
    specs, store::{self, DataSet},
};

/// Summary of what was produced.
#[derive(Debug)]
pub struct RunSummary {
    pub files_written: Vec<PathBuf>,
    pub merged_rows: usize,
}

/// Both provider tables, as fetched (or loaded), before any cleaning.
pub struct Sources {
    pub roster: DataSet,
    pub market: DataSet,
}

/// Roster table: local snapshot if configured, else the Sleeper API.
pub fn load_roster(opts: &AppOptions, fetcher: &dyn PageFetcher) -> Result<DataSet> {
    let _span = info_span!("fetch", provider = %Provider::Sleeper).entered();
    let ds = match &opts.fetch.roster_file {
        Some(path) => store::load_dataset(path)?,
        None => specs::sleeper::fetch(fetcher, &opts.fetch.sleeper_url)?,
    };
    require_rows(Provider::Sleeper, ds)
}

/// Market table: local snapshot if configured, else one KTC page.
pub fn load_market(opts: &AppOptions, fetcher: &dyn PageFetcher) -> Result<DataSet> {
    let _span = info_span!("fetch", provider = %Provider::KeepTradeCut).entered();
    let ds = match &opts.fetch.market_file {
        Some(path) => store::load_dataset(path)?,
        None => specs::ktc::fetch(fetcher, &opts.fetch.ktc_page_url())?,
    };
    require_rows(Provider::KeepTradeCut, ds)
}

// Merge must never see an empty provider table.
fn require_rows(provider: Provider, ds: DataSet) -> Result<DataSet> {
    if ds.is_empty() {
        return Err(Error::unavailable(provider, "no rows returned"));
    }
    Ok(ds)
}

pub fn collect(
    opts: &AppOptions,
    fetcher: &dyn PageFetcher,
    progress: &mut dyn Progress,
) -> Result<Sources> {
    let roster = load_roster(opts, fetcher)?;
    progress.stage_done(Stage::Roster, roster.len());

    let market = load_market(opts, fetcher)?;
    progress.stage_done(Stage::Market, market.len());

    Ok(Sources { roster, market })
}

fn merge_sources(opts: &AppOptions, sources: &Sources) -> Result<DataSet> {
    merge::clean_and_merge(
        &sources.roster,
        &opts.roster_schema,
        &sources.market,
        &opts.market_schema,
    )
}

/// Stateless mode: fetch, clean, merge, hand the table back. No files.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn fetch_merged(
    opts: &AppOptions,
    fetcher: &dyn PageFetcher,
    progress: Option<&mut dyn Progress>,
) -> Result<DataSet> {
    let mut null = NullProgress;
    let p: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };

    p.begin(3);
    let result = collect(opts, fetcher, p).and_then(|sources| merge_sources(opts, &sources));
    if let Ok(ds) = &result {
        p.stage_done(Stage::Merge, ds.len());
    }
    p.finish();
    result
}

/// File mode: fetch, merge, write the merged table and (optionally) the
/// raw provider snapshots. Nothing is written unless both providers
/// delivered and the merge succeeded; a failed write removes every file
/// this run already produced.
pub fn run(
    opts: &AppOptions,
    fetcher: &dyn PageFetcher,
    progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let mut null = NullProgress;
    let p: &mut dyn Progress = match progress {
        Some(p) => p,
        None => &mut null,
    };

    p.begin(4);
    let result = run_stages(opts, fetcher, p);
    p.finish();
    result
}

fn run_stages(
    opts: &AppOptions,
    fetcher: &dyn PageFetcher,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    let sources = collect(opts, fetcher, progress)?;
    let merged = merge_sources(opts, &sources)?;
    progress.stage_done(Stage::Merge, merged.len());

    let mut written = Vec::new();
    if let Err(e) = write_outputs(opts, &sources, &merged, &mut written) {
        discard(&written);
        return Err(e);
    }

    progress.stage_done(Stage::Export, merged.len());
    progress.log(&format!("Merged dynasty market data saved to {}", written[0].display()));
    info!(files = written.len(), rows = merged.len(), "run complete");

    Ok(RunSummary { files_written: written, merged_rows: merged.len() })
}

/// Raw snapshots first, merged table last; the merged path ends up first in
/// `written`. A path is recorded before its write starts.
fn write_outputs(
    opts: &AppOptions,
    sources: &Sources,
    merged: &DataSet,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let export = &opts.export;
    if export.write_raw {
        for (stem, ds) in [(RAW_SLEEPER_FILE, &sources.roster), (RAW_KTC_FILE, &sources.market)] {
            let path = export.raw_path(stem);
            written.push(path.clone());
            store::save_dataset(&path, ds, export.format)?;
        }
    }
    written.insert(0, export.out_path());
    file::write_export(export, merged)?;
    Ok(())
}

// A failed export leaves nothing half-written behind.
fn discard(paths: &[PathBuf]) {
    for path in paths.iter().filter(|p| p.is_file()) {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "could not remove partial output");
        }
    }
}
