// src/config/consts.rs

// Net config
pub const SLEEPER_PLAYERS_URL: &str = "https://api.sleeper.app/v1/players/nfl";
pub const KTC_RANKINGS_URL: &str = "https://keeptradecut.com/dynasty-rankings";
pub const USER_AGENT: &str = concat!("dynasty_market/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Merge
pub const KEY_COLUMN: &str = "norm_name";
pub const SLEEPER_TAG: &str = "sleeper";
pub const KTC_TAG: &str = "ktc";

// Export
pub const DEFAULT_OUT_DIR: &str = "data_outputs";
pub const DEFAULT_FILE: &str = "dynasty_market_data";
pub const RAW_SLEEPER_FILE: &str = "sleeper_raw";
pub const RAW_KTC_FILE: &str = "ktc_raw";
