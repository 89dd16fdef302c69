//! Season assignment from the source's per-season game ranks.

use super::models::GameRow;
use chrono::Datelike;

/// Label of the season with the given cumulative index, e.g. `2009-2010`.
pub fn season_label(start_year: i32, index: i32) -> String {
    format!("{}-{}", start_year + index - 1, start_year + index)
}

/// Assigns `season_index` and `season` to date-sorted rows.
///
/// The index is the number of season openers (rank `"1"`) at or before each
/// row; the first season starts in the calendar year of the earliest date.
pub fn assign_seasons(rows: Vec<GameRow>) -> Vec<GameRow> {
    let Some(start_year) = rows.iter().map(|row| row.date.year()).min() else {
        return rows;
    };

    let mut openers = 0;
    rows.into_iter()
        .map(|mut row| {
            if row.is_season_opener() {
                openers += 1;
            }
            row.season_index = openers;
            row.season = season_label(start_year, openers);
            row
        })
        .collect()
}
