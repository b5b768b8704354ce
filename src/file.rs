// src/file.rs

use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use tracing::info;

use crate::config::options::{ExportFormat, ExportOptions};
use crate::error::Result;
use crate::store::DataSet;

/// Write the merged table to `export.out_path()`. Returns the path written.
pub fn write_export(export: &ExportOptions, ds: &DataSet) -> Result<PathBuf> {
    let path = export.out_path();
    write_dataset(&path, ds, export.include_headers, export.format)?;
    info!(path = %path.display(), rows = ds.len(), "wrote merged table");
    Ok(path)
}

/// Create/truncate `path` (parents included) and write `ds` into it.
pub fn write_dataset(
    path: &Path,
    ds: &DataSet,
    include_headers: bool,
    format: ExportFormat,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let out = BufWriter::new(File::create(path)?);
    crate::csv::write_dataset(out, ds, include_headers, format.delim())?;
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::other(format!(
            "Path exists but is not a directory: {}",
            dir.display()
        )));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

pub fn looks_like_dir_hint(p: &Path) -> bool {
    let s = p.to_string_lossy();
    s.ends_with('/') || s.ends_with('\\')
}
