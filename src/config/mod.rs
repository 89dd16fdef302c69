use crate::constants::{defaults, env_vars, retry};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing scraper and cleaner settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the players section of the stats site, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Root of the acquisition output (`html/` and `csv/` live below it).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Directory for cleaned per-player files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// JSON mapping of player id to display name.
    #[serde(default = "default_players_file")]
    pub players_file: PathBuf,
    /// First season (end year, as the site numbers them) to fetch.
    #[serde(default = "default_start_season")]
    pub start_season: i32,
    /// Last season (inclusive) to fetch.
    #[serde(default = "default_end_season")]
    pub end_season: i32,
    /// HTTP timeout in seconds for page requests.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Attempts per season page before giving up on it.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed wait between attempts.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,
    /// Wait after every season request.
    #[serde(default = "default_request_delay")]
    pub request_delay_seconds: u64,
    /// Extra wait after a page loads, before its markup is kept.
    #[serde(default)]
    pub render_delay_seconds: u64,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
}

fn default_base_url() -> String {
    defaults::BASE_URL.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(defaults::DATA_DIR)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(defaults::OUTPUT_DIR)
}

fn default_players_file() -> PathBuf {
    PathBuf::from(defaults::PLAYERS_FILE)
}

fn default_start_season() -> i32 {
    defaults::START_SEASON
}

fn default_end_season() -> i32 {
    defaults::END_SEASON
}

fn default_http_timeout() -> u64 {
    crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_max_retries() -> u32 {
    retry::MAX_ATTEMPTS
}

fn default_retry_delay() -> u64 {
    retry::RETRY_DELAY_SECONDS
}

fn default_request_delay() -> u64 {
    retry::REQUEST_DELAY_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: default_base_url(),
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            players_file: default_players_file(),
            start_season: default_start_season(),
            end_season: default_end_season(),
            http_timeout_seconds: default_http_timeout(),
            max_retries: default_max_retries(),
            retry_delay_seconds: default_retry_delay(),
            request_delay_seconds: default_request_delay(),
            render_delay_seconds: 0,
            log_file_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// If no config file exists, the defaults are written there first.
    /// Environment variables can override config file values.
    ///
    /// # Environment Variables
    /// - `HOOPS_BASE_URL` - Override the players base URL
    /// - `HOOPS_LOG_FILE` - Override log file path
    /// - `HOOPS_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    /// - `HOOPS_DATA_DIR` - Override the acquisition output root
    /// - `HOOPS_OUTPUT_DIR` - Override the cleaned output directory
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            let config = Config::default();
            config.save().await?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies `HOOPS_*` environment overrides on top of file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(env_vars::BASE_URL) {
            self.base_url = base_url;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Ok(dir) = std::env::var(env_vars::DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }

        if let Ok(dir) = std::env::var(env_vars::OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Directory holding the raw per-player markup.
    pub fn html_dir(&self) -> PathBuf {
        self.data_dir.join("html")
    }

    /// Directory holding the extracted per-player tables.
    pub fn csv_dir(&self) -> PathBuf {
        self.data_dir.join("csv")
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("Base URL:");
            println!("{}", config.base_url);
            println!("────────────────────────────────────");
            println!("Seasons:");
            println!("{} - {}", config.start_season, config.end_season);
            println!("────────────────────────────────────");
            println!("Data / Output:");
            println!("{}", config.data_dir.display());
            println!("{}", config.output_dir.display());
            println!("────────────────────────────────────");
            println!("Retries:");
            println!(
                "{} attempts, {}s apart, {}s between requests",
                config.max_retries, config.retry_delay_seconds, config.request_delay_seconds
            );
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/hoops_rest.log");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path, creating the parent directory if needed.
    /// A trailing slash on the base URL is stripped.
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.as_os_str().is_empty() && !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }

        let normalized = Config {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            ..self.clone()
        };
        let content = toml::to_string_pretty(&normalized)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
