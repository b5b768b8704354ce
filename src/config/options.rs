// src/config/options.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;
use crate::schema::SourceSchema;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppOptions {
    pub fetch: FetchOptions,
    pub export: ExportOptions,
    pub roster_schema: SourceSchema,
    pub market_schema: SourceSchema,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            fetch: FetchOptions::default(),
            export: ExportOptions::default(),
            roster_schema: SourceSchema::sleeper(),
            market_schema: SourceSchema::ktc(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    pub sleeper_url: String,
    pub ktc_url: String,
    /// Ranking page index. Only this one page is fetched.
    pub ktc_page: u32,
    pub timeout: Duration,
    /// Read the roster from a local snapshot instead of the API.
    pub roster_file: Option<PathBuf>,
    /// Read the market table from a local snapshot instead of the site.
    pub market_file: Option<PathBuf>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            sleeper_url: s!(SLEEPER_PLAYERS_URL),
            ktc_url: s!(KTC_RANKINGS_URL),
            ktc_page: 0,
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            roster_file: None,
            market_file: None,
        }
    }
}

impl FetchOptions {
    pub fn ktc_page_url(&self) -> String {
        format!("{}?page={}", self.ktc_url, self.ktc_page)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self { ExportFormat::Csv => "csv", ExportFormat::Tsv => "tsv" }
    }
    pub fn delim(&self) -> u8 {
        match self { ExportFormat::Csv => b',', ExportFormat::Tsv => b'\t' }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    out_path: OutputPath,
    pub include_headers: bool,
    /// Also persist the unmerged provider tables next to the merged file.
    pub write_raw: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            out_path: OutputPath::default(),
            include_headers: true,
            write_raw: true,
        }
    }
}

impl ExportOptions {
    /// `<dir>/<stem>.<ext>`; the extension always follows `format`.
    pub fn out_path(&self) -> PathBuf {
        self.sibling_path(&self.out_path.file_stem.to_string_lossy())
    }

    /// Path for a raw snapshot written beside the merged file.
    pub fn raw_path(&self, stem: &str) -> PathBuf {
        self.sibling_path(stem)
    }

    /// Directory the merged file and raw snapshots go to.
    pub fn out_dir(&self) -> &Path {
        &self.out_path.dir
    }

    fn sibling_path(&self, stem: &str) -> PathBuf {
        self.out_dir().join(join!(stem, ".", self.format.ext()))
    }

    /// Parse user text into dir + stem. A pasted extension is ignored;
    /// a trailing separator or an existing directory keeps the default stem.
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        if s.is_empty() {
            return;
        }
        let p = Path::new(s);

        if crate::file::looks_like_dir_hint(p) || p.is_dir() {
            self.out_path.dir = p.to_path_buf();
            self.out_path.file_stem = OsString::from(DEFAULT_FILE);
            return;
        }
        if let Some(parent) = p.parent() {
            self.out_path.dir = parent.to_path_buf();
        }
        if let Some(stem) = p.file_stem() {
            self.out_path.file_stem = stem.to_os_string();
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputPath {
    dir: PathBuf,
    file_stem: OsString, // without extension
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_FILE),
        }
    }
}
