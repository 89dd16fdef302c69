use crate::cleaning::models::{GameLog, GameRow, RestType};
use crate::cleaning::normalize::normalize_table;
use crate::table::RawTable;

const ROW_COLUMNS: [&str; 4] = ["Rk", "G", "Date", "MP"];
const STAT_COLUMNS: [&str; 5] = ["Rk", "G", "Date", "MP", "PTS"];

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Test utilities for creating game log fixtures
pub struct TestDataBuilder;

impl TestDataBuilder {
    /// Creates a raw table with the given headers and rows
    pub fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        let mut table = RawTable::new(strings(headers));
        for row in rows {
            table.push_row(strings(row));
        }
        table
    }

    /// Creates normalized rows from `(rank, date, minutes)` triples.
    ///
    /// The game counter mirrors the rank. Seasons are left unassigned.
    pub fn rows(games: &[(&str, &str, &str)]) -> Vec<GameRow> {
        let rows: Vec<[&str; 4]> = games
            .iter()
            .map(|&(rank, date, minutes)| [rank, rank, date, minutes])
            .collect();
        Self::normalized(&ROW_COLUMNS, &rows).rows
    }

    /// Like [`TestDataBuilder::rows`] with an extra `PTS` column
    pub fn stat_rows(games: &[(&str, &str, &str, &str)]) -> Vec<GameRow> {
        let rows: Vec<[&str; 5]> = games
            .iter()
            .map(|&(rank, date, minutes, points)| [rank, rank, date, minutes, points])
            .collect();
        Self::normalized(&STAT_COLUMNS, &rows).rows
    }

    /// Wraps rows built by [`TestDataBuilder::stat_rows`] into a log
    pub fn stat_log(rows: Vec<GameRow>) -> GameLog {
        GameLog {
            columns: strings(&STAT_COLUMNS),
            rows,
        }
    }

    /// Creates a scraped-looking game log table, one row per game.
    ///
    /// Each row is `(rank, date, minutes, points)`; noise columns and a
    /// repeated header row are included so the table looks like the source.
    pub fn scraped_table(games: &[(&str, &str, &str, &str)]) -> RawTable {
        let headers = [
            "Rk", "G", "Date", "Age", "Tm", "Unnamed: 5", "Opp", "GS", "MP", "FG%", "PTS",
            "GmSc",
        ];
        let mut table = RawTable::new(strings(&headers));
        for (idx, &(rank, date, minutes, points)) in games.iter().enumerate() {
            if idx > 0 && idx % 20 == 0 {
                table.push_row(strings(&headers));
            }
            let played = points.parse::<u32>().is_ok();
            let game = if played { rank } else { "" };
            let pct = if played { ".500" } else { minutes };
            table.push_row(strings(&[
                rank, game, date, "27-100", "LAL", "@", "BOS", "1", minutes, pct, points, "10.0",
            ]));
        }
        table
    }

    fn normalized<const N: usize>(columns: &[&str; N], rows: &[[&str; N]]) -> GameLog {
        let mut table = RawTable::new(strings(columns));
        for row in rows {
            table.push_row(strings(row));
        }
        normalize_table(table, "fixture").unwrap_or_default()
    }
}

/// Property checks shared by unit and integration tests
pub struct PropertyTesting;

impl PropertyTesting {
    /// Validates the classification invariants of a cleaned, date-sorted log
    pub fn validate_classified_rows(rows: &[GameRow]) -> Result<(), String> {
        for (idx, row) in rows.iter().enumerate() {
            if row.days_rested < 0 {
                return Err(format!("Row {idx} has negative days rested"));
            }
            if row.minutes.is_absent() && row.rest_type == RestType::Normal {
                return Err(format!("Absent row {idx} is classified Normal"));
            }
            if row.rest_type != RestType::Normal && row.days_rested != 0 {
                return Err(format!(
                    "Row {idx} rests {} days but is {}",
                    row.days_rested, row.rest_type
                ));
            }
            let season_start = idx == 0 || rows[idx - 1].season_index != row.season_index;
            if (season_start || row.is_season_opener()) && row.days_rested != 0 {
                return Err(format!("Season start row {idx} has nonzero days rested"));
            }
            if idx > 0 {
                let prev = &rows[idx - 1];
                if prev.date > row.date {
                    return Err(format!("Row {idx} is out of date order"));
                }
                let pair = [prev.rest_type, row.rest_type];
                if pair.contains(&RestType::LoadManagement)
                    && pair.contains(&RestType::InjuredIllness)
                {
                    return Err(format!(
                        "Row {idx} mixes Load Management and Injured/Illness with its predecessor"
                    ));
                }
                if row.season_index < prev.season_index
                    || row.season_index > prev.season_index + 1
                {
                    return Err(format!("Row {idx} breaks season contiguity"));
                }
            }
        }
        Ok(())
    }
}
