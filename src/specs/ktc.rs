// src/specs/ktc.rs
//! Market provider: KeepTradeCut dynasty rankings.
//!
//! One page is fetched. Two places on that page can hold the rankings:
//! - the `playersArray = [...]` blob inside a `<script>` (preferred, full
//!   records with `playerName`, `position`, value objects, …),
//! - the rendered list under `id="rankings-page-rankings"`, one
//!   `player-name-wrapper` block per player (fallback, scraped once).
//!
//! Neither present → `ProviderUnavailable`.

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::core::html::{inner_after_open_tag, strip_tags, Page};
use crate::core::net::PageFetcher;
use crate::core::sanitize::{normalize_entities, split_details, strip_age_marker};
use crate::error::{Error, Provider, Result};
use crate::store::DataSet;

const PROVIDER: Provider = Provider::KeepTradeCut;
const BLOB_MARKER: &str = "playersArray";
const RANKINGS_ID: &str = "rankings-page-rankings";
const WRAPPER_CLASS: &str = "player-name-wrapper";
const VALUE_CLASSES: [&str; 4] = ["ktc-player-value", "value", "ktc-value", "player-value"];

/// Columns produced by the HTML fallback, in order.
pub const FALLBACK_COLUMNS: [&str; 7] = ["name", "details", "position", "team", "age", "height", "value"];

/// Which part of the page the rows came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extraction {
    ScriptBlob,
    RenderedList,
}

/// Fetch one rankings page and extract the market table.
pub fn fetch(fetcher: &dyn PageFetcher, url: &str) -> Result<DataSet> {
    let doc = fetcher.get_text(PROVIDER, url)?;
    let (ds, how) = parse_page(&doc).ok_or_else(|| {
        Error::unavailable(PROVIDER, format!("no player rankings found on {url}"))
    })?;
    info!(rows = ds.len(), columns = ds.headers.len(), via = ?how, "ktc rankings");
    Ok(ds)
}

/// Try the script blob first, then the rendered list. `None` if neither
/// yields at least one row.
pub fn parse_page(doc: &str) -> Option<(DataSet, Extraction)> {
    if let Some(ds) = parse_script_blob(doc) {
        return Some((ds, Extraction::ScriptBlob));
    }
    debug!("no playersArray blob; scraping rendered list");
    parse_rendered_list(doc).map(|ds| (ds, Extraction::RenderedList))
}

/* ---------- embedded JSON ---------- */

pub fn parse_script_blob(doc: &str) -> Option<DataSet> {
    let page = Page::new(doc);
    let mut pos = 0usize;
    while let Some((s, e)) = page.next_block("<script", "</script>", pos) {
        pos = e;
        let body = inner_after_open_tag(&doc[s..e]);
        if !body.contains(BLOB_MARKER) {
            continue;
        }
        match players_array(&body) {
            Some(records) if !records.is_empty() => return Some(DataSet::from_records(records)),
            Some(_) => debug!("playersArray blob is empty"),
            None => warn!("playersArray present but not a JSON array of objects"),
        }
    }
    None
}

/// First JSON value after `playersArray =`, if it is an array. Non-object
/// elements are dropped.
fn players_array(script: &str) -> Option<Vec<Map<String, Value>>> {
    let mut from = 0usize;
    while let Some(rel) = script[from..].find(BLOB_MARKER) {
        let after = from + rel + BLOB_MARKER.len();
        from = after;

        let rest = script[after..].trim_start();
        let Some(rest) = rest.strip_prefix('=') else { continue };

        // Stream parser stops after the first complete value; the trailing
        // `;` and whatever script follows are never read.
        let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
        return match stream.next() {
            Some(Ok(Value::Array(items))) => Some(
                items
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::Object(m) => Some(m),
                        _ => None,
                    })
                    .collect(),
            ),
            _ => None,
        };
    }
    None
}

/* ---------- rendered list ---------- */

pub fn parse_rendered_list(doc: &str) -> Option<DataSet> {
    let page = Page::new(doc);
    let (_, list_start) = page.find_tag_with_attr(Some("div"), "id", RANKINGS_ID, 0)?;

    // Wrapper start offsets; each player's segment runs to the next wrapper.
    let mut starts = Vec::new();
    let mut pos = list_start;
    while let Some((s, e)) = page.find_tag_with_attr(Some("div"), "class", WRAPPER_CLASS, pos) {
        starts.push(s);
        pos = e;
    }
    if starts.is_empty() {
        return None;
    }

    let mut ds = DataSet::new(FALLBACK_COLUMNS.iter().map(|c| s!(*c)).collect());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(doc.len());
        ds.rows.push(player_row(&Page::new(&doc[start..end])));
    }
    Some(ds)
}

fn text_cell(s: Option<String>) -> Value {
    match s {
        Some(t) if !t.is_empty() => Value::String(t),
        _ => Value::Null,
    }
}

fn player_row(segment: &Page) -> Vec<Value> {
    let name = segment
        .find_tag_with_attr(Some("p"), "class", "player-name", 0)
        .map(|(_, e)| segment.element_text(e, "p"));
    let details = segment
        .find_tag_with_attr(Some("p"), "class", "player-details", 0)
        .map(|(_, e)| segment.element_text(e, "p"))
        .filter(|d| !d.is_empty());

    let (mut position, mut team, mut age, mut height) = (None, None, None, None);
    if let Some(d) = details.as_deref().filter(|d| *d != "RDP") {
        let parts = split_details(d);
        let mut it = parts.into_iter();
        position = it.next();
        team = it.next();
        age = it.next().map(|a| strip_age_marker(&a));
        height = it.next();
    }

    vec![
        text_cell(name),
        text_cell(details),
        text_cell(position),
        text_cell(team),
        text_cell(age),
        text_cell(height),
        text_cell(player_value(segment)),
    ]
}

/// Value element: any tag carrying one of the known class names, else the
/// first `<span>`/`<div>` whose whole text is digits.
fn player_value(segment: &Page) -> Option<String> {
    for class in VALUE_CLASSES {
        if let Some((s, e)) = segment.find_tag_with_attr(None, "class", class, 0) {
            let txt = segment.element_text(e, segment.tag_name_at(s));
            if !txt.is_empty() {
                return Some(txt);
            }
        }
    }

    let raw = segment.raw();
    for tag in ["<span", "<div"] {
        let close = join!("</", &tag[1..], ">");
        let mut pos = 0usize;
        while let Some((s, e)) = segment.next_block(tag, &close, pos) {
            pos = e;
            let txt = strip_tags(normalize_entities(&inner_after_open_tag(&raw[s..e])));
            if !txt.is_empty() && txt.chars().all(|c| c.is_ascii_digit()) {
                return Some(txt);
            }
        }
    }
    None
}
