// src/csv.rs
use std::io::{Read, Write};

use csv::{ReaderBuilder, WriterBuilder};
use serde_json::{Number, Value};

use crate::store::{cell_text, Cell, DataSet};

/* ---------------- Parsing ---------------- */

/// Read a delimited table whose first record is the header row.
/// Ragged rows are tolerated and padded with `Null`.
pub fn read_dataset<R: Read>(rdr: R, sep: u8) -> Result<DataSet, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .delimiter(sep)
        .flexible(true)
        .from_reader(rdr);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let width = headers.len();
    let mut ds = DataSet::new(headers);

    for record in reader.records() {
        let record = record?;
        let mut row: Vec<Cell> = record.iter().map(infer_cell).collect();
        row.resize(width, Value::Null);
        ds.rows.push(row);
    }
    Ok(ds)
}

/// Empty → `Null`; integer or finite float text → number; otherwise string.
pub fn infer_cell(field: &str) -> Cell {
    if field.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = field.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = field.parse::<f64>() {
        if let Some(n) = Number::from_f64(f) {
            if f.is_finite() && looks_numeric(field) {
                return Value::Number(n);
            }
        }
    }
    Value::String(field.to_string())
}

// f64::from_str accepts "inf" / "NaN"; keep those as text.
fn looks_numeric(field: &str) -> bool {
    field.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}

/* ---------------- Writing ---------------- */

/// Write a dataset (optionally with its header row) to any writer.
pub fn write_dataset<W: Write>(
    w: W,
    ds: &DataSet,
    include_headers: bool,
    sep: u8,
) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .delimiter(sep)
        .flexible(true)
        .from_writer(w);

    if include_headers {
        writer.write_record(&ds.headers)?;
    }
    for i in 0..ds.len() {
        let row: Vec<String> = ds.row_padded(i).iter().map(cell_text).collect();
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Full export as a string (stdout mode).
pub fn to_export_string(ds: &DataSet, include_headers: bool, sep: u8) -> Result<String, csv::Error> {
    let mut buf: Vec<u8> = Vec::new();
    write_dataset(&mut buf, ds, include_headers, sep)?;

    Ok(match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    })
}
