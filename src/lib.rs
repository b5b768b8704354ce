// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod csv;
pub mod error;
pub mod file;
pub mod log;
pub mod merge;
pub mod progress;
pub mod runner;
pub mod schema;
pub mod specs;
pub mod store;

pub use core::normalize_name;
pub use error::{Error, Provider, Result};
pub use merge::{clean_and_merge, merge};
pub use store::DataSet;
