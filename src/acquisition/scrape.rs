//! Per-player acquisition: fetch every season page, keep the raw markup and
//! extract the game log table from it.

use super::extract::extract_game_log;
use super::fetch::{PageFetcher, RetryPolicy, fetch_with_retry};
use super::players::Player;
use super::urls::season_urls;
use crate::config::Config;
use crate::constants::GAME_LOG_TABLE_ID;
use crate::error::AppError;
use crate::status;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// Table written; `rows` counts every extracted row, header repeats included.
    Saved { rows: usize },
    /// Stopped early; what was downloaded so far was still extracted.
    Interrupted { rows: usize },
    /// No game log table in any season page.
    NoData,
    /// Both artifacts were already complete.
    Skipped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub saved: usize,
    pub no_data: usize,
    pub skipped: usize,
    pub failed: usize,
    pub interrupted: bool,
}

pub struct Scraper<F> {
    fetcher: F,
    base_url: String,
    start_season: i32,
    end_season: i32,
    html_dir: PathBuf,
    csv_dir: PathBuf,
    policy: RetryPolicy,
    request_delay: Duration,
}

impl<F: PageFetcher> Scraper<F> {
    pub fn new(fetcher: F, config: &Config) -> Self {
        Scraper {
            fetcher,
            base_url: config.base_url.clone(),
            start_season: config.start_season,
            end_season: config.end_season,
            html_dir: config.html_dir(),
            csv_dir: config.csv_dir(),
            policy: RetryPolicy::from_config(config),
            request_delay: Duration::from_secs(config.request_delay_seconds),
        }
    }

    pub fn html_path(&self, player_id: &str) -> PathBuf {
        self.html_dir.join(format!("{player_id}.html"))
    }

    pub fn csv_path(&self, player_id: &str) -> PathBuf {
        self.csv_dir.join(format!("{player_id}.csv"))
    }

    /// Downloads all season pages of a player into `html_path`.
    ///
    /// Returns the accumulated markup and whether every season was visited.
    async fn download(
        &self,
        player: &Player,
        html_path: &Path,
        stop: &AtomicBool,
    ) -> Result<(String, bool), AppError> {
        fs::write(html_path, "").await?;
        let mut file = fs::OpenOptions::new().append(true).open(html_path).await?;
        let mut markup = String::new();
        let mut last_error = None;

        let urls = season_urls(
            &self.base_url,
            &player.id,
            self.start_season,
            self.end_season,
        );
        let total = urls.len();
        for (idx, (season, url)) in urls.into_iter().enumerate() {
            if stop.load(Ordering::SeqCst) {
                info!("Stop requested, keeping {} seasons of {}", idx, player.id);
                file.flush().await?;
                return Ok((markup, false));
            }

            match fetch_with_retry(&self.fetcher, &url, &self.policy).await {
                Ok(body) => {
                    file.write_all(body.as_bytes()).await?;
                    markup.push_str(&body);
                    debug!("Stored season {season} of {}", player.id);
                }
                Err(e) if e.is_not_found() => {
                    debug!("No {season} game log for {}", player.id);
                }
                Err(e) => {
                    warn!("Skipping season {season} of {}: {e}", player.id);
                    last_error = Some(e);
                }
            }

            if idx + 1 < total && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
        }
        file.flush().await?;

        match last_error {
            Some(e) if markup.is_empty() => Err(e),
            _ => Ok((markup, true)),
        }
    }

    async fn discard_html(&self, html_path: &Path) -> Result<(), AppError> {
        status::clear_marker(html_path)?;
        match fs::remove_file(html_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Acquires one player's raw markup and game log table.
    ///
    /// A previously completed page download is reused without refetching; a
    /// player with no table anywhere leaves neither artifact behind.
    pub async fn scrape_player(
        &self,
        player: &Player,
        stop: &AtomicBool,
    ) -> Result<ScrapeOutcome, AppError> {
        fs::create_dir_all(&self.html_dir).await?;
        fs::create_dir_all(&self.csv_dir).await?;
        let html_path = self.html_path(&player.id);
        let csv_path = self.csv_path(&player.id);

        if status::is_complete(&csv_path, Some(&html_path)) {
            debug!("Skipping {}: already scraped", player.id);
            return Ok(ScrapeOutcome::Skipped);
        }

        let (markup, complete) = if status::is_complete(&html_path, None) {
            info!("Re-extracting {} from stored markup", player.id);
            (fs::read_to_string(&html_path).await?, true)
        } else {
            status::clear_marker(&html_path)?;
            info!("Scraping {} ({})", player.name, player.id);
            match self.download(player, &html_path, stop).await {
                Ok(downloaded) => downloaded,
                Err(e) => {
                    self.discard_html(&html_path).await?;
                    return Err(e);
                }
            }
        };

        let table = match extract_game_log(&markup, &player.id, GAME_LOG_TABLE_ID) {
            Ok(table) => table,
            Err(AppError::NoTable { .. }) => {
                info!("No game log table for {}", player.id);
                self.discard_html(&html_path).await?;
                status::clear_marker(&csv_path)?;
                return Ok(ScrapeOutcome::NoData);
            }
            Err(e) => return Err(e),
        };

        status::clear_marker(&csv_path)?;
        table.write_csv(&csv_path)?;
        let rows = table.rows.len();

        if !complete {
            return Ok(ScrapeOutcome::Interrupted { rows });
        }
        status::mark_complete(&html_path, None)?;
        status::mark_complete(&csv_path, Some(&html_path))?;
        info!("Saved {rows} rows for {} to {}", player.id, csv_path.display());
        Ok(ScrapeOutcome::Saved { rows })
    }

    /// Scrapes players in order until done or `stop` is raised.
    pub async fn scrape_players(&self, players: &[Player], stop: &AtomicBool) -> ScrapeSummary {
        let mut summary = ScrapeSummary::default();
        for player in players {
            if stop.load(Ordering::SeqCst) {
                summary.interrupted = true;
                break;
            }

            match self.scrape_player(player, stop).await {
                Ok(ScrapeOutcome::Saved { .. }) => summary.saved += 1,
                Ok(ScrapeOutcome::Interrupted { .. }) => {
                    summary.interrupted = true;
                    break;
                }
                Ok(ScrapeOutcome::NoData) => summary.no_data += 1,
                Ok(ScrapeOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    error!("Failed to scrape {}: {e}", player.id);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Scraping finished: {} saved, {} without data, {} skipped, {} failed{}",
            summary.saved,
            summary.no_data,
            summary.skipped,
            summary.failed,
            if summary.interrupted { " (interrupted)" } else { "" }
        );
        summary
    }
}
