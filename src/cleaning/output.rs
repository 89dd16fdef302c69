//! Layout of the cleaned CSV: `Regular` game rows with each season's
//! `Average` row placed right after the season's last game.

use super::models::{GameLog, GameRow, SeasonSummary};
use crate::constants::columns;
use crate::table::RawTable;

pub const REGULAR: &str = "Regular";
pub const AVERAGE: &str = "Average";

fn output_column_name(column: &str) -> String {
    match column {
        columns::GAME => columns::OUT_GAME.to_string(),
        columns::DATE => columns::OUT_DATE.to_string(),
        other => other.to_string(),
    }
}

/// Averages are written with at least one decimal, `25.0` rather than `25`.
pub fn format_average(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

pub fn output_headers(source_columns: &[String]) -> Vec<String> {
    let mut headers: Vec<String> = source_columns
        .iter()
        .map(|c| output_column_name(c))
        .collect();
    headers.extend(
        [
            columns::SEASON,
            columns::REST_TYPE,
            columns::DAYS_RESTED,
            columns::ROW_TYPE,
        ]
        .map(String::from),
    );
    headers.extend(columns::AVERAGED.iter().map(|stat| format!("Average {stat}")));
    headers.push(columns::GAMES_PLAYED.to_string());
    headers
}

fn regular_record(row: &GameRow) -> Vec<String> {
    let mut record = row.fields.clone();
    record.push(row.season.clone());
    record.push(row.rest_type.to_string());
    record.push(row.days_rested.to_string());
    record.push(REGULAR.to_string());
    record.extend(std::iter::repeat_n(String::new(), columns::AVERAGED.len() + 1));
    record
}

fn average_record(source_width: usize, summary: &SeasonSummary) -> Vec<String> {
    let mut record = vec![String::new(); source_width];
    record.push(summary.season.clone());
    record.push(String::new());
    record.push(String::new());
    record.push(AVERAGE.to_string());
    record.extend(columns::AVERAGED.iter().map(|stat| {
        summary
            .average(stat)
            .map(format_average)
            .unwrap_or_default()
    }));
    record.push(
        summary
            .games_played
            .map(|g| g.to_string())
            .unwrap_or_default(),
    );
    record
}

/// Builds the output table from classified rows and their season summaries.
pub fn build_output(log: &GameLog, summaries: &[SeasonSummary]) -> RawTable {
    let mut table = RawTable::new(output_headers(&log.columns));
    let source_width = log.columns.len();
    let mut pending = summaries.iter().peekable();

    for (idx, row) in log.rows.iter().enumerate() {
        table.push_row(regular_record(row));

        let season_ends = log
            .rows
            .get(idx + 1)
            .is_none_or(|next| next.season != row.season);
        if season_ends
            && let Some(summary) = pending.next_if(|summary| summary.season == row.season)
        {
            table.push_row(average_record(source_width, summary));
        }
    }
    table
}
