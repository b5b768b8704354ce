// src/specs/sleeper.rs
//! Roster provider: Sleeper's all-players endpoint.
//!
//! Payload is one JSON object keyed by player id, each value a player
//! object (`full_name`, `position`, `team`, `player_id`, …). Column set is
//! whatever the API sends; `DataSet::from_records` unions it.

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::core::net::PageFetcher;
use crate::error::{Error, Provider, Result};
use crate::store::DataSet;

const PROVIDER: Provider = Provider::Sleeper;

/// GET the players endpoint and shape it into a table.
pub fn fetch(fetcher: &dyn PageFetcher, url: &str) -> Result<DataSet> {
    let body = fetcher.get_text(PROVIDER, url)?;
    let ds = parse_players(&body)?;
    info!(rows = ds.len(), columns = ds.headers.len(), "sleeper roster");
    Ok(ds)
}

/// Parse an id → player map (or a bare array of players).
/// Non-object entries are skipped. Zero players is `ProviderUnavailable`.
pub fn parse_players(body: &str) -> Result<DataSet> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| Error::unavailable(PROVIDER, format!("malformed players payload: {e}")))?;

    let entries: Vec<Value> = match root {
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        Value::Array(items) => items,
        other => {
            return Err(Error::unavailable(
                PROVIDER,
                format!("unexpected players payload type: {}", json_type(&other)),
            ));
        }
    };

    let total = entries.len();
    let records: Vec<Map<String, Value>> = entries
        .into_iter()
        .filter_map(|v| match v {
            Value::Object(m) => Some(m),
            _ => None,
        })
        .collect();
    if records.len() < total {
        debug!(skipped = total - records.len(), "non-object player entries");
    }
    if records.is_empty() {
        return Err(Error::unavailable(PROVIDER, "players payload is empty"));
    }
    Ok(DataSet::from_records(records))
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
