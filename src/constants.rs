//! Application-wide constants and configuration values
//!
//! This module centralizes the fixed tokens, column names and default
//! settings shared by the acquisition and cleaning stages.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 4;

/// Browser-like user agent; the stats site serves a stripped page to unknown agents
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Id of the per-game basic stats table on a game log page
pub const GAME_LOG_TABLE_ID: &str = "pgl_basic";

/// Default values for the persisted configuration
pub mod defaults {
    pub const BASE_URL: &str = "https://www.basketball-reference.com/players";
    pub const DATA_DIR: &str = "dataset";
    pub const OUTPUT_DIR: &str = "cleaned_dataset";
    pub const PLAYERS_FILE: &str = "player_id_to_name_mapping.json";
    pub const START_SEASON: i32 = 2010;
    pub const END_SEASON: i32 = 2020;
}

/// Retry and pacing configuration for page fetches
pub mod retry {
    /// Maximum number of attempts per season page
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Fixed delay between attempts (seconds)
    pub const RETRY_DELAY_SECONDS: u64 = 10;

    /// Delay after every season request; keeps us under 15 requests per minute
    pub const REQUEST_DELAY_SECONDS: u64 = 4;
}

/// Environment variable names
pub mod env_vars {
    pub const BASE_URL: &str = "HOOPS_BASE_URL";
    pub const LOG_FILE: &str = "HOOPS_LOG_FILE";
    pub const HTTP_TIMEOUT: &str = "HOOPS_HTTP_TIMEOUT";
    pub const DATA_DIR: &str = "HOOPS_DATA_DIR";
    pub const OUTPUT_DIR: &str = "HOOPS_OUTPUT_DIR";
}

/// Column names of the game log table
pub mod columns {
    pub const RANK: &str = "Rk";
    pub const GAME: &str = "G";
    pub const DATE: &str = "Date";
    pub const AGE: &str = "Age";
    pub const MINUTES: &str = "MP";

    /// Source columns with no analytical value
    pub const NOISE: [&str; 6] = ["Tm", "Unnamed: 5", "Opp", "GS", "Unnamed: 7", "GmSc"];

    /// Stats averaged per season, in output order
    pub const AVERAGED: [&str; 10] = [
        "PTS", "AST", "TRB", "FG%", "MP", "FT%", "3P%", "BLK", "TOV", "STL",
    ];

    /// Name fragments marking a shooting percentage column
    pub const PERCENTAGE_MARKERS: [&str; 3] = ["FT%", "3P%", "FG%"];

    // Output-only columns
    pub const OUT_GAME: &str = "Game";
    pub const OUT_DATE: &str = "Game Date";
    pub const SEASON: &str = "Season";
    pub const REST_TYPE: &str = "Rest Type";
    pub const DAYS_RESTED: &str = "Days Rested";
    pub const ROW_TYPE: &str = "Type";
    pub const GAMES_PLAYED: &str = "Games Played";
}

/// A run of consecutive absences longer than this counts as an injury stretch
pub const INJURY_RUN_THRESHOLD: usize = 3;

/// Number of trailing rows of an injury stretch that can be softened back to load management
pub const SOFTENED_TAIL_LEN: usize = 3;
