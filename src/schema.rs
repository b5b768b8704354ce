// src/schema.rs
//! Column resolution for the two provider tables.
//!
//! Providers do not negotiate a schema; each `SourceSchema` lists the
//! column names it knows about, in priority order, and resolution picks
//! the first one present. Tests can drive every fallback by handing in a
//! table that lacks the earlier candidates.

use std::fmt;

use tracing::warn;

use crate::config::consts::{KEY_COLUMN, KTC_TAG, SLEEPER_TAG};
use crate::error::{Error, Result};
use crate::store::{Cell, DataSet};

/// Fantasy-relevant positions. Anything else is filtered out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
}

impl Position {
    pub const ALL: [Position; 4] = [Position::QB, Position::RB, Position::WR, Position::TE];

    /// Exact, case-sensitive match.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }

    pub fn from_cell(cell: &Cell) -> Option<Self> {
        cell.as_str().and_then(Self::parse)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentityRule {
    /// Display-name column; values go through the normalizer.
    Name(String),
    /// Internal id column; values are stringified, not normalized.
    Id(String),
    /// First textual column other than the key column; normalized.
    FirstTextColumn,
}

impl fmt::Display for IdentityRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityRule::Name(c) => write!(f, "name column '{c}'"),
            IdentityRule::Id(c) => write!(f, "id column '{c}'"),
            IdentityRule::FirstTextColumn => f.write_str("first text column"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityKind {
    DisplayName,
    InternalId,
}

/// Outcome of identity resolution against a concrete table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identity {
    pub column: usize,
    pub kind: IdentityKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSchema {
    /// Suffix appended to this source's column names on collision.
    pub tag: String,
    pub identity: Vec<IdentityRule>,
    pub position: String,
    /// Missing position column is a schema error when set.
    pub position_required: bool,
}

impl SourceSchema {
    /// Sleeper roster: `full_name`, falling back to `player_id`.
    pub fn sleeper() -> Self {
        Self {
            tag: s!(SLEEPER_TAG),
            identity: vec![
                IdentityRule::Name(s!("full_name")),
                IdentityRule::Id(s!("player_id")),
            ],
            position: s!("position"),
            position_required: true,
        }
    }

    /// KTC market: `playerName`, then `name`, then the first text column.
    pub fn ktc() -> Self {
        Self {
            tag: s!(KTC_TAG),
            identity: vec![
                IdentityRule::Name(s!("playerName")),
                IdentityRule::Name(s!("name")),
                IdentityRule::FirstTextColumn,
            ],
            position: s!("position"),
            position_required: false,
        }
    }

    /// Pick the identity column: first rule that matches wins.
    pub fn resolve_identity(&self, ds: &DataSet) -> Result<Identity> {
        for (i, rule) in self.identity.iter().enumerate() {
            let hit = match rule {
                IdentityRule::Name(c) => ds
                    .column(c)
                    .map(|column| Identity { column, kind: IdentityKind::DisplayName }),
                IdentityRule::Id(c) => ds
                    .column(c)
                    .map(|column| Identity { column, kind: IdentityKind::InternalId }),
                IdentityRule::FirstTextColumn => (0..ds.headers.len())
                    .find(|&c| ds.headers[c] != KEY_COLUMN && ds.is_text_column(c))
                    .map(|column| Identity { column, kind: IdentityKind::DisplayName }),
            };
            if let Some(found) = hit {
                if i > 0 {
                    warn!(
                        source = %self.tag,
                        rule = %rule,
                        column = %ds.headers[found.column],
                        "identity fell back past preferred column"
                    );
                }
                return Ok(found);
            }
        }

        let tried: Vec<String> = self.identity.iter().map(|r| r.to_string()).collect();
        Err(Error::schema(format!(
            "{} table has no usable identity column (tried: {})",
            self.tag,
            tried.join(", ")
        )))
    }

    /// Position column index. `Ok(None)` only when the column is optional.
    pub fn resolve_position(&self, ds: &DataSet) -> Result<Option<usize>> {
        match ds.column(&self.position) {
            Some(c) => Ok(Some(c)),
            None if self.position_required => Err(Error::schema(format!(
                "{} table has no '{}' column",
                self.tag, self.position
            ))),
            None => Ok(None),
        }
    }
}
