//! Cleaning stage: turns a player's scraped game log into the cleaned CSV.
//!
//! A table goes through normalization, season assignment, rest classification
//! and per-season averaging, in that order. Each step is a plain function over
//! owned rows; only [`clean_file`] and [`clean_all`] touch the filesystem.

pub mod averages;
pub mod models;
pub mod normalize;
pub mod output;
pub mod rest;
pub mod season;

use crate::error::AppError;
use crate::status;
use crate::table::RawTable;
use models::{GameLog, SeasonSummary};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub use averages::{custom_mean, summarize_seasons};
pub use models::{AbsenceToken, GameRow, Minutes, RestType};
pub use rest::classify_rows;

/// Suffix appended to the player id in cleaned file names
pub const CLEANED_SUFFIX: &str = "_cleaned";

/// A player's log after all cleaning passes.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedLog {
    pub log: GameLog,
    pub summaries: Vec<SeasonSummary>,
}

impl CleanedLog {
    pub fn to_table(&self) -> RawTable {
        output::build_output(&self.log, &self.summaries)
    }
}

/// Outcome counts of a [`clean_all`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub cleaned: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Runs every cleaning pass over a scraped table.
pub fn clean_table(table: RawTable, source: &str) -> Result<CleanedLog, AppError> {
    let GameLog { columns, rows } = normalize::normalize_table(table, source)?;
    let rows = season::assign_seasons(rows);
    let rows = rest::classify_rows(rows);
    let log = GameLog { columns, rows };
    let summaries = averages::summarize_seasons(&log);
    Ok(CleanedLog { log, summaries })
}

/// `<output_dir>/<stem>_cleaned.csv` for an input `<stem>.csv`.
pub fn cleaned_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}{CLEANED_SUFFIX}.csv"))
}

/// Cleans one file and records the output as complete.
pub fn clean_file(input: &Path, output: &Path) -> Result<CleanedLog, AppError> {
    let source = input.display().to_string();
    let table = RawTable::read_csv(input)?;
    let cleaned = clean_table(table, &source)?;

    status::clear_marker(output)?;
    cleaned.to_table().write_csv(output)?;
    status::mark_complete(output, Some(input))?;

    debug!(
        "Cleaned {source}: {} rows, {} seasons",
        cleaned.log.rows.len(),
        cleaned.summaries.len()
    );
    Ok(cleaned)
}

/// Scraped CSV files of `input_dir` in name order, optionally limited to `players`.
pub fn input_files(input_dir: &Path, players: &[String]) -> Result<Vec<PathBuf>, AppError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
        .filter(|path| {
            players.is_empty()
                || path
                    .file_stem()
                    .is_some_and(|stem| players.iter().any(|p| stem == p.as_str()))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Cleans every scraped CSV in `input_dir` into `output_dir`.
///
/// Files whose cleaned output is still complete for the current input are
/// skipped. A failing file is logged and does not stop the run.
pub fn clean_all(
    input_dir: &Path,
    output_dir: &Path,
    players: &[String],
) -> Result<CleanSummary, AppError> {
    std::fs::create_dir_all(output_dir)?;
    let files = input_files(input_dir, players)?;
    info!(
        "Cleaning {} files from {} into {}",
        files.len(),
        input_dir.display(),
        output_dir.display()
    );

    let mut summary = CleanSummary::default();
    for input in &files {
        let output = cleaned_path(input, output_dir);
        if status::is_complete(&output, Some(input)) {
            debug!("Skipping {}: already cleaned", input.display());
            summary.skipped += 1;
            continue;
        }

        match clean_file(input, &output) {
            Ok(_) => {
                info!("Cleaned {} -> {}", input.display(), output.display());
                summary.cleaned += 1;
            }
            Err(e) => {
                error!("Failed to clean {}: {e}", input.display());
                summary.failed += 1;
            }
        }
    }

    info!(
        "Cleaning finished: {} cleaned, {} skipped, {} failed",
        summary.cleaned, summary.skipped, summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{PropertyTesting, TestDataBuilder};
    use tempfile::tempdir;

    fn sample_table() -> RawTable {
        TestDataBuilder::scraped_table(&[
            ("1", "2019-10-22", "30:00", "20"),
            ("2", "2019-10-24", "Did Not Play", "Did Not Play"),
            ("3", "2019-10-26", "34:00", "30"),
            ("1", "2020-10-22", "20:00", "10"),
        ])
    }

    #[test]
    fn test_clean_table_runs_all_passes() {
        let cleaned = clean_table(sample_table(), "sample").unwrap();
        assert_eq!(cleaned.summaries.len(), 2);
        assert_eq!(cleaned.log.rows[1].rest_type, RestType::LoadManagement);
        assert_eq!(cleaned.log.rows[2].days_rested, 4);
        assert!(PropertyTesting::validate_classified_rows(&cleaned.log.rows).is_ok());
    }

    #[test]
    fn test_clean_table_leading_injury_run() {
        let table = TestDataBuilder::table(
            &["Rk", "Date", "MP"],
            &[
                &["1", "2020-01-01", "Did Not Play"],
                &["2", "2020-01-03", "Did Not Play"],
                &["3", "2020-01-05", "Did Not Play"],
                &["4", "2020-01-07", "Did Not Play"],
                &["5", "2020-01-09", "30:00"],
            ],
        );
        let cleaned = clean_table(table, "sample").unwrap();
        let types: Vec<RestType> = cleaned.log.rows.iter().map(|r| r.rest_type).collect();
        assert_eq!(
            types,
            vec![
                RestType::InjuredIllness,
                RestType::InjuredIllness,
                RestType::InjuredIllness,
                RestType::InjuredIllness,
                RestType::Normal
            ]
        );
        assert_eq!(cleaned.log.rows[4].days_rested, 0);
    }

    #[test]
    fn test_cleaned_path() {
        assert_eq!(
            cleaned_path(Path::new("dataset/csv/jamesle01.csv"), Path::new("out")),
            PathBuf::from("out/jamesle01_cleaned.csv")
        );
    }

    #[test]
    fn test_input_files_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        for name in ["b.csv", "a.csv", "c.txt", "d.csv"] {
            std::fs::write(dir.path().join(name), "Rk,Date\n").unwrap();
        }
        let all = input_files(dir.path(), &[]).unwrap();
        let names: Vec<_> = all.iter().map(|p| p.file_name().unwrap()).collect();
        assert_eq!(names, vec!["a.csv", "b.csv", "d.csv"]);

        let some = input_files(dir.path(), &["d".to_string()]).unwrap();
        assert_eq!(some, vec![dir.path().join("d.csv")]);
    }

    #[test]
    fn test_clean_all_skips_and_continues_on_failure() {
        let input = tempdir().unwrap();
        let output = tempdir().unwrap();
        sample_table()
            .write_csv(&input.path().join("good01.csv"))
            .unwrap();
        std::fs::write(input.path().join("bad01.csv"), "Foo,Bar\n1,2\n").unwrap();

        let first = clean_all(input.path(), output.path(), &[]).unwrap();
        assert_eq!(
            first,
            CleanSummary {
                cleaned: 1,
                skipped: 0,
                failed: 1
            }
        );
        assert!(output.path().join("good01_cleaned.csv").exists());
        assert!(!output.path().join("bad01_cleaned.csv").exists());

        let second = clean_all(input.path(), output.path(), &[]).unwrap();
        assert_eq!(second.skipped, 1);
        assert_eq!(second.cleaned, 0);
    }
}
