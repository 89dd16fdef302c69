//! Per-season averages with the source's mixed value encodings.

use super::models::{GameLog, GameRow, SeasonSummary, is_absence_token};
use super::normalize::{parse_clock_minutes, round_to};
use crate::constants::columns;

fn is_percentage_column(column: &str) -> bool {
    columns::PERCENTAGE_MARKERS
        .iter()
        .any(|marker| column.contains(marker))
}

/// Fractions packed into one cell, e.g. `".456.500"` -> `[0.456, 0.5]`.
fn split_fractions(value: &str) -> impl Iterator<Item = f64> + '_ {
    value
        .split('.')
        .skip(1)
        .filter(|fragment| !fragment.is_empty())
        .filter_map(|fragment| format!("0.{fragment}").parse::<f64>().ok())
}

/// Numbers carried by one cell: packed fractions, `"MM:SS"` minutes or a plain number.
fn cell_numbers(value: &str) -> Vec<f64> {
    if value.matches('.').count() >= 2 {
        split_fractions(value).collect()
    } else if value.contains(':') {
        parse_clock_minutes(value).into_iter().collect()
    } else {
        value
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .into_iter()
            .collect()
    }
}

/// Mean of a season's values for one column.
///
/// Absence tokens and blanks are ignored. A cell holding several decimal
/// points is split into separate fractions, `"MM:SS"` cells are read as
/// minutes, and anything else must parse as a number or is dropped.
/// Percentages round to 3 places, everything else to 1. Returns `None` when
/// nothing is left to average.
pub fn custom_mean(column: &str, values: &[&str]) -> Option<f64> {
    let numbers: Vec<f64> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && !is_absence_token(v))
        .flat_map(cell_numbers)
        .collect();

    if numbers.is_empty() {
        return None;
    }

    let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
    let decimals = if is_percentage_column(column) { 3 } else { 1 };
    Some(round_to(mean, decimals))
}

/// One summary per season, in season order.
pub fn summarize_seasons(log: &GameLog) -> Vec<SeasonSummary> {
    let mut seasons: Vec<(&str, Vec<&GameRow>)> = Vec::new();
    for row in &log.rows {
        match seasons.last_mut() {
            Some((season, rows)) if *season == row.season => rows.push(row),
            _ => seasons.push((row.season.as_str(), vec![row])),
        }
    }

    seasons
        .into_iter()
        .map(|(season, rows)| {
            let averages = columns::AVERAGED
                .iter()
                .map(|column| {
                    let average = log
                        .column_values(column, rows.iter().copied())
                        .and_then(|values| custom_mean(column, &values));
                    (column.to_string(), average)
                })
                .collect();

            SeasonSummary {
                season: season.to_string(),
                averages,
                games_played: rows.iter().filter_map(|row| row.game).max(),
            }
        })
        .collect()
}
