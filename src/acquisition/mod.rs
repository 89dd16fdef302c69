//! Acquisition stage: game log pages in, raw markup and flat tables out.

pub mod extract;
pub mod fetch;
pub mod http_client;
pub mod players;
pub mod scrape;
pub mod urls;

pub use extract::{extract_game_log, extract_tables};
pub use fetch::{HttpFetcher, PageFetcher, RetryPolicy, fetch_with_retry};
pub use players::{Player, filter_players, load_players};
pub use scrape::{ScrapeOutcome, ScrapeSummary, Scraper};
pub use urls::build_gamelog_url;
