// src/main.rs
mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Args, is_config_command, selected_stages};
use hoops_rest::config::Config;
use hoops_rest::error::AppError;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    commands::validate_args(&args)?;

    if args.version {
        commands::handle_version_command();
        return Ok(());
    }

    let config = Config::load().await;
    let (log_file_path, _guard) = logging::setup_logging(&args, config.as_ref().ok()).await?;
    info!("Logs are being written to: {log_file_path}");

    if args.list_config {
        return commands::handle_list_config_command().await;
    }
    if is_config_command(&args) {
        return commands::handle_config_update_command(&args).await;
    }

    let mut config = config?;
    commands::apply_arg_overrides(&mut config, &args);
    config.validate()?;

    let (scrape, clean) = selected_stages(&args);
    if scrape {
        let summary = commands::handle_scrape_command(&config, &args).await?;
        if summary.interrupted {
            warn!("Run interrupted; start it again to resume");
            return Ok(());
        }
    }
    if clean {
        let summary = commands::handle_clean_command(&config, &args).await?;
        if summary.failed > 0 {
            warn!("{} files could not be cleaned, see the log", summary.failed);
        }
    }

    Ok(())
}
