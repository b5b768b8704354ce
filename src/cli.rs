// src/cli.rs
use std::{io::Write, path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};

use crate::config::options::{AppOptions, ExportFormat};
use crate::core::net::HttpFetcher;
use crate::progress::{Progress, Stage};
use crate::runner;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Csv,
    Tsv,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Tsv => ExportFormat::Tsv,
        }
    }
}

/// Join Sleeper roster metadata with KeepTradeCut dynasty values.
#[derive(Debug, Parser)]
#[command(name = "dynasty_market", version, about)]
pub struct Args {
    /// Merged output path (file, or directory ending in a separator)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "csv")]
    pub format: FormatArg,

    /// Omit the header row
    #[arg(long)]
    pub no_headers: bool,

    /// Skip the raw sleeper/ktc snapshots
    #[arg(long)]
    pub no_raw: bool,

    /// Print the merged table to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,

    /// Merge a saved roster snapshot instead of calling the API
    #[arg(long)]
    pub roster_file: Option<PathBuf>,

    /// Merge a saved market snapshot instead of fetching the rankings page
    #[arg(long)]
    pub market_file: Option<PathBuf>,

    /// Rankings page index
    #[arg(long, default_value_t = 0)]
    pub ktc_page: u32,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = crate::config::consts::REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn to_options(&self) -> AppOptions {
        let mut opts = AppOptions::default();

        opts.fetch.ktc_page = self.ktc_page;
        opts.fetch.timeout = Duration::from_secs(self.timeout);
        opts.fetch.roster_file = self.roster_file.clone();
        opts.fetch.market_file = self.market_file.clone();

        opts.export.format = self.format.into();
        opts.export.include_headers = !self.no_headers;
        opts.export.write_raw = !self.no_raw;
        if let Some(out) = &self.out {
            opts.export.set_path(&out.to_string_lossy());
        }
        opts
    }
}

/// Console progress: one stderr line per stage.
struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn stage_done(&mut self, stage: Stage, rows: usize) {
        eprintln!("[{}] {} rows", stage.label(), rows);
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    crate::log::init(args.verbose, args.log_file.as_deref())?;

    let opts = args.to_options();
    let fetcher = HttpFetcher::new(opts.fetch.timeout)?;
    let mut progress = ConsoleProgress;

    if args.stdout {
        let merged = runner::fetch_merged(&opts, &fetcher, Some(&mut progress))?;
        let text = crate::csv::to_export_string(
            &merged,
            opts.export.include_headers,
            opts.export.format.delim(),
        )?;
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        return Ok(());
    }

    let summary = runner::run(&opts, &fetcher, Some(&mut progress))?;
    for path in summary.files_written.iter().skip(1) {
        eprintln!("Raw data saved to {}", path.display());
    }
    Ok(())
}
