use crate::cli::Args;
use hoops_rest::acquisition::{HttpFetcher, ScrapeSummary, Scraper, filter_players, load_players};
use hoops_rest::cleaning::{CleanSummary, clean_all};
use hoops_rest::config::Config;
use hoops_rest::error::AppError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Validates command line argument combinations.
pub fn validate_args(args: &Args) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (args.start_season, args.end_season)
        && start > end
    {
        return Err(AppError::config_error(format!(
            "--start-season ({start}) is after --end-season ({end})"
        )));
    }
    if args.new_log_file_path.is_some() && args.clear_log_file_path {
        return Err(AppError::config_error(
            "Cannot use --set-log-file and --clear-log-file together",
        ));
    }
    Ok(())
}

/// Handles the --version command.
pub fn handle_version_command() {
    println!("{} {}", hoops_rest::NAME, hoops_rest::VERSION);
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--set-base-url, --set-log-file, --clear-log-file).
///
/// Starts from the stored configuration, or the defaults when it cannot be
/// loaded, and saves the result.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let mut config = Config::load().await.unwrap_or_default();

    if let Some(base_url) = &args.new_base_url {
        config.base_url = base_url.clone();
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }

    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

/// Applies per-run command line overrides on top of the loaded config.
pub fn apply_arg_overrides(config: &mut Config, args: &Args) {
    if let Some(players_file) = &args.players_file {
        config.players_file = players_file.clone();
    }
    if let Some(start) = args.start_season {
        config.start_season = start;
    }
    if let Some(end) = args.end_season {
        config.end_season = end;
    }
    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
}

/// Runs the acquisition stage until every player is done or Ctrl-C is pressed.
pub async fn handle_scrape_command(
    config: &Config,
    args: &Args,
) -> Result<ScrapeSummary, AppError> {
    let players = filter_players(load_players(&config.players_file).await?, &args.player);
    info!(
        "Scraping {} players, seasons {}-{}",
        players.len(),
        config.start_season,
        config.end_season
    );

    let scraper = Scraper::new(HttpFetcher::from_config(config)?, config);
    let stop = Arc::new(AtomicBool::new(false));
    let signal_flag = Arc::clone(&stop);
    let signal_task = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing the current player");
            signal_flag.store(true, Ordering::SeqCst);
        }
    });

    let summary = scraper.scrape_players(&players, &stop).await;
    signal_task.abort();
    Ok(summary)
}

/// Runs the cleaning stage over every extracted table.
///
/// Cleaning is synchronous file work, so it runs on the blocking pool.
pub async fn handle_clean_command(
    config: &Config,
    args: &Args,
) -> Result<CleanSummary, AppError> {
    let input_dir = config.csv_dir();
    if !tokio::fs::try_exists(&input_dir).await.unwrap_or(false) {
        warn!("Nothing to clean: {} does not exist", input_dir.display());
        return Ok(CleanSummary::default());
    }
    let output_dir = config.output_dir.clone();
    let players = args.player.clone();
    tokio::task::spawn_blocking(move || clean_all(&input_dir, &output_dir, &players)).await?
}
