use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};
use std::path::PathBuf;

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Whether the invocation only edits or shows the configuration
pub fn is_config_command(args: &Args) -> bool {
    args.new_base_url.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
        || args.list_config
}

/// Stages to run as `(scrape, clean)`; selecting neither runs both.
pub fn selected_stages(args: &Args) -> (bool, bool) {
    if !args.scrape && !args.clean {
        (true, true)
    } else {
        (args.scrape, args.clean)
    }
}

/// Basketball game log scraper and rest classifier
///
/// Downloads per-season game logs for every player in the mapping file, keeps
/// the raw pages and the extracted tables under the data directory, then
/// writes one cleaned CSV per player with each game's rest classification and
/// per-season averages.
///
/// Players whose artifacts are already complete are skipped, so an
/// interrupted run can simply be started again. Ctrl-C finishes the current
/// player and stops.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
#[command(disable_version_flag = true)]
#[command(styles = get_styles())]
pub struct Args {
    /// Run only the acquisition stage.
    #[arg(long, help_heading = "Stages")]
    pub scrape: bool,

    /// Run only the cleaning stage.
    #[arg(long, help_heading = "Stages")]
    pub clean: bool,

    /// Player mapping file (JSON object of player id to name).
    #[arg(long = "players", value_name = "FILE", help_heading = "Input")]
    pub players_file: Option<PathBuf>,

    /// Limit the run to this player id. Can be given several times.
    #[arg(long = "player", value_name = "ID", help_heading = "Input")]
    pub player: Vec<String>,

    /// First season to fetch, by the year it ends in.
    #[arg(long, value_name = "YEAR", help_heading = "Input")]
    pub start_season: Option<i32>,

    /// Last season to fetch, inclusive.
    #[arg(long, value_name = "YEAR", help_heading = "Input")]
    pub end_season: Option<i32>,

    /// Root directory of raw pages and extracted tables.
    #[arg(long, value_name = "DIR", help_heading = "Output")]
    pub data_dir: Option<PathBuf>,

    /// Directory for cleaned per-player files.
    #[arg(long, value_name = "DIR", help_heading = "Output")]
    pub output_dir: Option<PathBuf>,

    /// Update the players base URL in config.
    #[arg(long = "set-base-url", value_name = "URL", help_heading = "Configuration")]
    pub new_base_url: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Show version information
    #[arg(short = 'V', long = "version", help_heading = "Info")]
    pub version: bool,

    /// Log debug details to the terminal as well as the log file.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_stage_flag_runs_both() {
        let args = Args::parse_from(["hoops_rest"]);
        assert_eq!(selected_stages(&args), (true, true));
    }

    #[test]
    fn test_single_stage_flags() {
        let args = Args::parse_from(["hoops_rest", "--clean"]);
        assert_eq!(selected_stages(&args), (false, true));
        let args = Args::parse_from(["hoops_rest", "--scrape", "--player", "a01", "--player", "b01"]);
        assert_eq!(selected_stages(&args), (true, false));
        assert_eq!(args.player, vec!["a01", "b01"]);
    }

    #[test]
    fn test_config_commands() {
        assert!(is_config_command(&Args::parse_from(["hoops_rest", "-l"])));
        assert!(is_config_command(&Args::parse_from(["hoops_rest", "--clear-log-file"])));
        assert!(!is_config_command(&Args::parse_from(["hoops_rest", "--start-season", "2015"])));
    }
}
