//! Basketball game log acquisition and rest classification.
//!
//! The crate has two stages. [`acquisition`] downloads a player's season game
//! log pages and extracts the game log table; [`cleaning`] turns that table
//! into a cleaned log where every game is tagged `Normal`, `Load Management`
//! or `Injured/Illness` and each season gets a row of averages.
//!
//! # Examples
//!
//! ```rust
//! use hoops_rest::cleaning::{RestType, clean_table};
//! use hoops_rest::table::RawTable;
//!
//! let csv = "Rk,G,Date,MP,PTS\n\
//!            1,1,2019-10-22,36:00,18\n\
//!            2,,2019-10-24,Inactive,Inactive\n\
//!            3,2,2019-10-26,32:30,30\n";
//! let table = RawTable::from_reader(csv.as_bytes())?;
//! let cleaned = clean_table(table, "example")?;
//!
//! assert_eq!(cleaned.log.rows[1].rest_type, RestType::LoadManagement);
//! assert_eq!(cleaned.log.rows[2].days_rested, 4);
//! assert_eq!(cleaned.summaries[0].average("PTS"), Some(24.0));
//! # Ok::<(), hoops_rest::AppError>(())
//! ```

pub mod acquisition;
pub mod cleaning;
pub mod config;
pub mod constants;
pub mod error;
pub mod status;
pub mod table;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use acquisition::{HttpFetcher, PageFetcher, Player, ScrapeOutcome, Scraper};
pub use cleaning::{CleanSummary, CleanedLog, clean_all, clean_file, clean_table};
pub use config::Config;
pub use error::AppError;
pub use table::RawTable;

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
