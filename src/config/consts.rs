// src/config/consts.rs

// Net config
pub const API_BASE: &str = "https://apiv2.legiontd2.com";
pub const GAMES_PATH: &str = "/games";
pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_ENV: &str = "LTD2_API_KEY";
pub const TIMEOUT_SECS: u64 = 30;

// Request pacing
pub const CALL_WAIT_MS: u64 = 1_000; // be polite
pub const RETRY_WAIT_SECS: u64 = 5;
pub const RATE_LIMIT_WAIT_SECS: u64 = 10;
pub const MAX_RETRIES: u32 = 5;
pub const REQUEST_BUDGET: u64 = 10_000; // the API's own daily cap

// Query window
pub const MAX_PAGE_LIMIT: u32 = 50;
pub const MAX_OFFSET: u64 = 50_000; // API rejects offsets past this
pub const FIRST_MATCH_DATE: &str = "2018-08-03 15:39:00"; // oldest match on record

// Board
pub const GRID_ROWS: usize = 28; // y axis, half-cell resolution
pub const GRID_COLS: usize = 18; // x axis
pub const STACKS_VERSION: f64 = 9.06; // placement strings carry stacks from here on

// Output
pub const DEFAULT_OUT_DIR: &str = "data";
pub const DEFAULT_SAVE_INTERVAL: u64 = 500; // in offset units
pub const STORE_SEP: char = ',';
