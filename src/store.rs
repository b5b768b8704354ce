// src/store.rs
//! `DataSet`: the in-memory table every stage passes around, plus
//! snapshot load/save for raw provider tables.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::info;

use crate::config::options::ExportFormat;
use crate::error::Result;

/// One table cell. `Null` is a missing value; arrays and objects are opaque.
pub type Cell = Value;

static NULL: Cell = Value::Null;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl DataSet {
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers, rows: Vec::new() }
    }

    /// Build a table from JSON objects. Columns are the union of keys in
    /// first-seen order; keys a record lacks read as `Null`.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        let records: Vec<Map<String, Value>> = records.into_iter().collect();

        let mut headers: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for rec in &records {
            for k in rec.keys() {
                if seen.insert(k.as_str()) {
                    headers.push(k.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|rec| {
                headers
                    .iter()
                    .map(|h| rec.get(h).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at (`row`, `col`); short rows read as `Null`.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&NULL)
    }

    /// A column is textual when any non-null cell is a string.
    pub fn is_text_column(&self, col: usize) -> bool {
        self.rows
            .iter()
            .any(|r| matches!(r.get(col), Some(Value::String(_))))
    }

    /// Owned copy of one row, padded with `Null` to the header width.
    pub fn row_padded(&self, row: usize) -> Vec<Cell> {
        (0..self.headers.len()).map(|c| self.cell(row, c).clone()).collect()
    }
}

/// Text rendering used for export and id stringification.
/// Null → empty, strings verbatim, numbers decimal, bools `true`/`false`,
/// arrays/objects compact JSON.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Value::Null => s!(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Write a raw provider table beside the merged export.
pub fn save_dataset(path: &Path, ds: &DataSet, format: ExportFormat) -> Result<PathBuf> {
    crate::file::write_dataset(path, ds, true, format)?;
    info!(path = %path.display(), rows = ds.len(), "saved snapshot");
    Ok(path.to_path_buf())
}

/// Load a previously saved snapshot (header row required). The delimiter
/// is picked from the extension: `.tsv` is tab, anything else comma.
pub fn load_dataset(path: &Path) -> Result<DataSet> {
    let format = match path.extension().and_then(|e| e.to_str()) {
        Some(e) if e.eq_ignore_ascii_case("tsv") => ExportFormat::Tsv,
        _ => ExportFormat::Csv,
    };
    let file = File::open(path)?;
    let ds = crate::csv::read_dataset(BufReader::new(file), format.delim())?;
    info!(path = %path.display(), rows = ds.len(), "loaded snapshot");
    Ok(ds)
}
