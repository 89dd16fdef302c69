use super::Config;
use crate::error::AppError;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Base URL cannot be empty and must use http or https
/// - Season range must be ordered (start <= end)
/// - At least one fetch attempt per page
/// - If log file path is provided, it cannot be empty and its parent directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    let base_url = config.base_url.trim();
    if base_url.is_empty() {
        return Err(AppError::config_error("Base URL cannot be empty"));
    }
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(AppError::config_error(
            "Base URL must start with http:// or https://",
        ));
    }

    if config.start_season > config.end_season {
        return Err(AppError::config_error(format!(
            "Start season {} is after end season {}",
            config.start_season, config.end_season
        )));
    }

    if config.max_retries == 0 {
        return Err(AppError::config_error("max_retries must be at least 1"));
    }

    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
