// src/merge.rs
//! Merge engine: joins the roster table (Sleeper) onto the market table
//! (KTC) by normalized name.
//!
//! The join is market-driven. Every market row that survives position
//! filtering and de-duplication is kept, with roster columns appended
//! (null when no roster row shares its key). Output columns are market
//! columns, then roster columns, then the key column `norm_name`. A name
//! present on both sides is suffixed on both sides with the source tag
//! (`position_ktc`, `position_sleeper`).

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, info, info_span};

use crate::config::consts::KEY_COLUMN;
use crate::core::normalize_cell;
use crate::error::Result;
use crate::schema::{IdentityKind, Position, SourceSchema};
use crate::store::{cell_text, Cell, DataSet};

/// A source table with its per-row join keys.
struct Keyed {
    ds: DataSet,
    keys: Vec<String>,
}

impl Keyed {
    fn retain(&mut self, mut keep: impl FnMut(usize, &str) -> bool) {
        let mut rows = Vec::with_capacity(self.ds.rows.len());
        let mut keys = Vec::with_capacity(self.keys.len());
        let old_rows = std::mem::take(&mut self.ds.rows);
        let old_keys = std::mem::take(&mut self.keys);

        for (i, (row, key)) in old_rows.into_iter().zip(old_keys).enumerate() {
            if keep(i, &key) {
                rows.push(row);
                keys.push(key);
            }
        }
        self.ds.rows = rows;
        self.keys = keys;
    }

    /// Keep rows whose `col` holds an allowed position.
    fn filter_positions(&mut self, col: usize) {
        let allowed: Vec<bool> = (0..self.ds.len())
            .map(|i| Position::from_cell(self.ds.cell(i, col)).is_some())
            .collect();
        self.retain(|i, _| allowed[i]);
    }

    /// First occurrence of each key wins.
    fn dedup(&mut self) {
        let mut seen: HashSet<String> = HashSet::with_capacity(self.keys.len());
        self.retain(|_, k| seen.insert(k.to_string()));
    }

    fn len(&self) -> usize { self.keys.len() }
}

/// Compute join keys for every row of `ds` under `schema`.
fn key_table(ds: &DataSet, schema: &SourceSchema) -> Result<Keyed> {
    let identity = schema.resolve_identity(ds)?;
    let keys = (0..ds.len())
        .map(|i| {
            let cell = ds.cell(i, identity.column);
            match identity.kind {
                IdentityKind::DisplayName => normalize_cell(cell),
                IdentityKind::InternalId => cell_text(cell),
            }
        })
        .collect();

    debug!(
        source = %schema.tag,
        column = %ds.headers[identity.column],
        kind = ?identity.kind,
        rows = ds.len(),
        "normalized keys"
    );

    // Drop any pre-existing key column so the computed one is the only one.
    let mut ds = ds.clone();
    if let Some(c) = ds.column(KEY_COLUMN) {
        ds.headers.remove(c);
        for row in &mut ds.rows {
            if c < row.len() {
                row.remove(c);
            }
        }
    }
    Ok(Keyed { ds, keys })
}

/// Clean both tables and join roster metadata onto market rows.
///
/// Fails only with `Error::Schema` when a table has no usable identity
/// column, or the roster has no position column. Empty results are valid.
pub fn clean_and_merge(
    roster: &DataSet,
    roster_schema: &SourceSchema,
    market: &DataSet,
    market_schema: &SourceSchema,
) -> Result<DataSet> {
    let _span = info_span!("merge").entered();

    // Roster: key, position filter, dedupe
    let mut roster = key_table(roster, roster_schema)?;
    if let Some(col) = roster_schema.resolve_position(&roster.ds)? {
        let before = roster.len();
        roster.filter_positions(col);
        debug!(source = %roster_schema.tag, before, after = roster.len(), "position filter");
    }
    roster.dedup();

    // Market keys, then roster restricted to the *raw* market key set
    let mut market = key_table(market, market_schema)?;
    {
        let market_keys: HashSet<&str> = market.keys.iter().map(String::as_str).collect();
        roster.retain(|_, k| market_keys.contains(k));
    }
    debug!(rows = roster.len(), "roster rows with a market key");

    // Market: optional position filter, dedupe
    if let Some(col) = market_schema.resolve_position(&market.ds)? {
        let before = market.len();
        market.filter_positions(col);
        debug!(source = %market_schema.tag, before, after = market.len(), "position filter");
    }
    market.dedup();

    let mut merged = left_join(&market, market_schema, &roster, roster_schema);

    // Dedupe the joined rows, then filter on whichever position column survived.
    let mut seen: HashSet<String> = HashSet::with_capacity(merged.len());
    let key_col = merged.headers.len() - 1;
    merged.rows.retain(|r| seen.insert(cell_text(&r[key_col])));

    if let Some(col) = post_join_position(&merged, market_schema, roster_schema) {
        merged.rows.retain(|r| Position::from_cell(&r[col]).is_some());
    }

    info!(
        rows = merged.len(),
        columns = merged.headers.len(),
        "merged"
    );
    Ok(merged)
}

/// Position column for the post-join filter. The market's own column comes
/// first (bare, then tag-suffixed): it is populated on every row, matched or
/// not. The roster column is used only when the market has none.
fn post_join_position(
    merged: &DataSet,
    market_schema: &SourceSchema,
    roster_schema: &SourceSchema,
) -> Option<usize> {
    let tagged = format!("{}_{}", market_schema.position, market_schema.tag);
    merged
        .column(&market_schema.position)
        .or_else(|| merged.column(&tagged))
        .or_else(|| merged.column(&roster_schema.position))
}

/// Market-driven left join. Every market row is emitted once; roster
/// cells are `Null` when the key has no roster match.
fn left_join(
    market: &Keyed,
    market_schema: &SourceSchema,
    roster: &Keyed,
    roster_schema: &SourceSchema,
) -> DataSet {
    let roster_names: HashSet<&str> = roster.ds.headers.iter().map(String::as_str).collect();
    let market_names: HashSet<&str> = market.ds.headers.iter().map(String::as_str).collect();

    let rename = |name: &String, other: &HashSet<&str>, tag: &str| {
        if other.contains(name.as_str()) {
            format!("{name}_{tag}")
        } else {
            name.clone()
        }
    };

    let mut headers: Vec<String> = Vec::with_capacity(market.ds.headers.len() + roster.ds.headers.len() + 1);
    headers.extend(market.ds.headers.iter().map(|h| rename(h, &roster_names, &market_schema.tag)));
    headers.extend(roster.ds.headers.iter().map(|h| rename(h, &market_names, &roster_schema.tag)));
    headers.push(s!(KEY_COLUMN));

    let by_key: HashMap<&str, usize> = roster
        .keys
        .iter()
        .enumerate()
        .map(|(i, k)| (k.as_str(), i))
        .collect();

    let roster_width = roster.ds.headers.len();
    let mut matched = 0usize;
    let rows: Vec<Vec<Cell>> = market
        .keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let mut row = market.ds.row_padded(i);
            match by_key.get(key.as_str()) {
                Some(&r) => {
                    matched += 1;
                    row.extend(roster.ds.row_padded(r));
                }
                None => row.extend(std::iter::repeat_n(Value::Null, roster_width)),
            }
            row.push(Value::String(key.clone()));
            row
        })
        .collect();

    debug!(market_rows = rows.len(), matched, "left join");
    DataSet { headers, rows }
}

/// Merge with the default Sleeper/KTC schemas.
pub fn merge(roster: &DataSet, market: &DataSet) -> Result<DataSet> {
    clean_and_merge(roster, &SourceSchema::sleeper(), market, &SourceSchema::ktc())
}
