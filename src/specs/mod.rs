// src/specs/mod.rs
//! # Provider “specs”
//!
//! One module per upstream source. Each spec knows *where the data lives*
//! in that provider's response and how to shape it into a `DataSet`:
//!
//! - `sleeper` – the players JSON endpoint (roster/metadata side).
//! - `ktc` – the dynasty rankings page (market side): embedded script blob
//!   first, rendered list as a one-shot fallback.
//!
//! Specs only extract. Keys, filtering and joining live in `merge`;
//! persistence lives in `store`/`file`.
//!
//! Every failure to produce rows surfaces as `Error::ProviderUnavailable`
//! so the runner never hands an unusable table to the merge engine.
//! Parsers are plain functions over `&str` and are tested offline against
//! inline fixtures.
pub mod ktc;
pub mod sleeper;
