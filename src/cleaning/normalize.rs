//! Column normalization: turns the flat scraped table into typed, date-sorted game rows.

use super::models::{AbsenceToken, GameLog, GameRow, Minutes, RestType};
use crate::constants::columns;
use crate::error::AppError;
use crate::table::RawTable;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rounds to the given number of decimal places, halves away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

static AGE_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"[0-9]{2}"));

/// First run of two ASCII digits, e.g. `"25-123"` -> 25.
pub fn parse_age(value: &str) -> Option<u32> {
    let pattern = AGE_PATTERN.as_ref().ok()?;
    pattern.find(value)?.as_str().parse().ok()
}

/// Game counter; blank or non-numeric values are missing.
pub fn parse_game_number(value: &str) -> Option<u32> {
    let number = value.trim().parse::<f64>().ok()?;
    (number.is_finite() && number >= 0.0).then(|| number as u32)
}

/// `"MM:SS"` to decimal minutes, unrounded.
pub fn parse_clock_minutes(value: &str) -> Option<f64> {
    let (minutes, seconds) = value.trim().split_once(':')?;
    let minutes = minutes.trim().parse::<f64>().ok()?;
    let seconds = seconds.trim().parse::<f64>().ok()?;
    Some(minutes + seconds / 60.0)
}

pub fn parse_minutes(value: &str) -> Minutes {
    if let Some(token) = AbsenceToken::parse(value) {
        return Minutes::Absent(token);
    }
    let value = value.trim();
    if value.contains(':') {
        return parse_clock_minutes(value)
            .map(|minutes| Minutes::Played(round_to(minutes, 1)))
            .unwrap_or(Minutes::Missing);
    }
    match value.parse::<f64>() {
        Ok(minutes) if minutes.is_finite() => Minutes::Played(round_to(minutes, 1)),
        _ => Minutes::Missing,
    }
}

fn is_numeric_rank(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .map(|rank| rank.is_finite())
        .unwrap_or(false)
}

/// Normalizes a scraped game log table.
///
/// Drops noise columns, rows without a numeric rank and rows without a valid
/// date, coerces `Age`, `G` and `MP`, then sorts the rows by date. The sort is
/// stable so same-day entries keep their source order.
///
/// `source` is only used to label errors.
pub fn normalize_table(mut table: RawTable, source: &str) -> Result<GameLog, AppError> {
    table.drop_columns(&columns::NOISE);

    let rank_idx = table
        .column_index(columns::RANK)
        .ok_or_else(|| AppError::missing_column(columns::RANK, source))?;
    let date_idx = table
        .column_index(columns::DATE)
        .ok_or_else(|| AppError::missing_column(columns::DATE, source))?;
    let game_idx = table.column_index(columns::GAME);
    let age_idx = table.column_index(columns::AGE);
    let minutes_idx = table.column_index(columns::MINUTES);

    let width = table.headers.len();
    let total = table.rows.len();
    let mut rows = Vec::with_capacity(total);
    let mut bad_dates = 0usize;

    for mut fields in table.rows {
        fields.resize(width, String::new());
        let rank = fields[rank_idx].trim().to_string();
        if !is_numeric_rank(&rank) {
            continue;
        }

        let Ok(date) = NaiveDate::parse_from_str(fields[date_idx].trim(), DATE_FORMAT) else {
            bad_dates += 1;
            continue;
        };

        let game = game_idx.and_then(|idx| parse_game_number(&fields[idx]));
        let age = age_idx.and_then(|idx| parse_age(&fields[idx]));
        let minutes = minutes_idx
            .map(|idx| parse_minutes(&fields[idx]))
            .unwrap_or(Minutes::Missing);

        fields[rank_idx] = rank.clone();
        fields[date_idx] = date.format(DATE_FORMAT).to_string();
        if let Some(idx) = game_idx {
            fields[idx] = game.map(|g| g.to_string()).unwrap_or_default();
        }
        if let Some(idx) = age_idx {
            fields[idx] = age.map(|a| a.to_string()).unwrap_or_default();
        }
        if let Some(idx) = minutes_idx {
            fields[idx] = minutes.to_string();
        }

        rows.push(GameRow {
            rank,
            game,
            date,
            age,
            minutes,
            season_index: 0,
            season: String::new(),
            rest_type: RestType::Normal,
            days_rested: 0,
            fields,
        });
    }

    if bad_dates > 0 {
        debug!("{source}: dropped {bad_dates} rows with unparseable dates");
    }
    debug!("{source}: kept {} of {total} rows", rows.len());

    rows.sort_by_key(|row| row.date);

    Ok(GameLog {
        columns: table.headers,
        rows,
    })
}
