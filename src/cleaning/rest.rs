//! Rest classification.
//!
//! Every missed game starts out as load management. Long stretches of missed
//! games are escalated to injury/illness, the tail of a stretch that ends in a
//! return to play is softened back to load management, and management rows
//! bordering an injury are absorbed into it. Days rested are then computed
//! between consecutive `Normal` games of the same season.
//!
//! Each step is a pure pass over an ordered slice of [`RestEntry`] returning a
//! new sequence, so the passes can be tested and reasoned about one at a time.

use super::models::{GameRow, RestType};
use crate::constants::{INJURY_RUN_THRESHOLD, SOFTENED_TAIL_LEN};
use chrono::NaiveDate;
use std::ops::Range;

/// The slice of a game row the classification passes look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestEntry {
    pub date: NaiveDate,
    pub absent: bool,
    pub season_opener: bool,
    pub season_index: i32,
    pub rest_type: RestType,
    pub days_rested: i64,
}

impl From<&GameRow> for RestEntry {
    fn from(row: &GameRow) -> Self {
        RestEntry {
            date: row.date,
            absent: row.minutes.is_absent(),
            season_opener: row.is_season_opener(),
            season_index: row.season_index,
            rest_type: row.rest_type,
            days_rested: row.days_rested,
        }
    }
}

fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// Maximal runs of consecutive absence entries, in order.
pub fn absence_runs(entries: &[RestEntry]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    for (idx, entry) in entries.iter().enumerate() {
        match (entry.absent, start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                runs.push(s..idx);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..entries.len());
    }
    runs
}

fn is_injury_run(run: &Range<usize>) -> bool {
    run.len() > INJURY_RUN_THRESHOLD
}

/// Pass 1: absences are load management, everything else is normal.
pub fn mark_absences(entries: &[RestEntry]) -> Vec<RestEntry> {
    entries
        .iter()
        .map(|entry| RestEntry {
            rest_type: if entry.absent {
                RestType::LoadManagement
            } else {
                RestType::Normal
            },
            ..*entry
        })
        .collect()
}

/// Pass 2: runs longer than the injury threshold become injury/illness.
///
/// Inside an escalated run only the last row carries a days-rested value: the
/// gap to the next entry, or 0 when the run reaches the end of the log.
pub fn escalate_long_runs(entries: &[RestEntry]) -> Vec<RestEntry> {
    let mut out = entries.to_vec();
    for run in absence_runs(entries).into_iter().filter(is_injury_run) {
        let last = run.end - 1;
        for idx in run.clone() {
            out[idx].rest_type = RestType::InjuredIllness;
            out[idx].days_rested = if idx == last {
                entries
                    .get(run.end)
                    .map(|next| days_between(entries[idx].date, next.date))
                    .unwrap_or(0)
            } else {
                0
            };
        }
    }
    out
}

/// Pass 3: soften the tail of an injury run that sits between two played stretches.
///
/// When the entry before the run is not itself an injury and a game follows the
/// run, its last rows go back to load management.
pub fn soften_run_tails(entries: &[RestEntry]) -> Vec<RestEntry> {
    let mut out = entries.to_vec();
    for run in absence_runs(entries).into_iter().filter(is_injury_run) {
        let preceded_by_non_injury = run
            .start
            .checked_sub(1)
            .is_some_and(|prev| entries[prev].rest_type != RestType::InjuredIllness);
        let followed_by_game = run.end < entries.len();
        if !(preceded_by_non_injury && followed_by_game) {
            continue;
        }

        for idx in run.end - SOFTENED_TAIL_LEN..run.end {
            if out[idx].rest_type == RestType::InjuredIllness {
                out[idx].rest_type = RestType::LoadManagement;
            }
        }
    }
    out
}

/// Pass 4: load management next to an injury becomes part of the injury.
///
/// Each sweep runs forward against the already merged previous entry, so a
/// management stretch that starts at an injury is absorbed whole. Sweeps repeat
/// until no entry changes, which also catches stretches that end at one.
pub fn absorb_adjacent(entries: &[RestEntry]) -> Vec<RestEntry> {
    let mut current = entries.to_vec();
    loop {
        let (merged, changed) = absorb_sweep(&current);
        if !changed {
            return merged;
        }
        current = merged;
    }
}

fn absorb_sweep(entries: &[RestEntry]) -> (Vec<RestEntry>, bool) {
    let mut merged: Vec<RestEntry> = Vec::with_capacity(entries.len());
    let mut changed = false;
    for (idx, entry) in entries.iter().enumerate() {
        let after_injury = merged
            .last()
            .is_some_and(|prev| prev.rest_type == RestType::InjuredIllness);
        let before_injury = entries
            .get(idx + 1)
            .is_some_and(|next| next.rest_type == RestType::InjuredIllness);
        if entry.rest_type == RestType::LoadManagement && (after_injury || before_injury) {
            changed = true;
            merged.push(RestEntry {
                rest_type: RestType::InjuredIllness,
                ..*entry
            });
        } else {
            merged.push(*entry);
        }
    }
    (merged, changed)
}

/// Pass 5: days since the previous `Normal` game of the same season.
///
/// Season openers and every non-`Normal` entry get 0, as does the first
/// `Normal` game of a season that only had absences before it.
pub fn compute_days_rested(entries: &[RestEntry]) -> Vec<RestEntry> {
    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let new_season = entry.season_opener
                || idx
                    .checked_sub(1)
                    .is_none_or(|prev| entries[prev].season_index != entry.season_index);

            let days_rested = if new_season || entry.rest_type != RestType::Normal {
                0
            } else {
                entries[..idx]
                    .iter()
                    .rev()
                    .take_while(|prev| prev.season_index == entry.season_index)
                    .find(|prev| prev.rest_type == RestType::Normal)
                    .map(|prev| days_between(prev.date, entry.date))
                    .unwrap_or(0)
            };

            RestEntry {
                days_rested,
                ..*entry
            }
        })
        .collect()
}

/// Runs all passes in order.
pub fn classify(entries: &[RestEntry]) -> Vec<RestEntry> {
    let marked = mark_absences(entries);
    let escalated = escalate_long_runs(&marked);
    let softened = soften_run_tails(&escalated);
    let merged = absorb_adjacent(&softened);
    compute_days_rested(&merged)
}

/// Classifies date-sorted, season-assigned rows.
pub fn classify_rows(rows: Vec<GameRow>) -> Vec<GameRow> {
    let entries: Vec<RestEntry> = rows.iter().map(RestEntry::from).collect();
    let classified = classify(&entries);
    rows.into_iter()
        .zip(classified)
        .map(|(mut row, entry)| {
            row.rest_type = entry.rest_type;
            row.days_rested = entry.days_rested;
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::season::assign_seasons;
    use crate::testing_utils::TestDataBuilder;

    const DNP: &str = "Did Not Play";

    fn entries(games: &[(&str, &str, &str)]) -> Vec<RestEntry> {
        assign_seasons(TestDataBuilder::rows(games))
            .iter()
            .map(RestEntry::from)
            .collect()
    }

    fn types(entries: &[RestEntry]) -> Vec<RestType> {
        entries.iter().map(|e| e.rest_type).collect()
    }

    fn days(entries: &[RestEntry]) -> Vec<i64> {
        entries.iter().map(|e| e.days_rested).collect()
    }

    use RestType::{InjuredIllness as I, LoadManagement as L, Normal as N};

    #[test]
    fn test_absence_runs() {
        let e = entries(&[
            ("1", "2020-01-01", DNP),
            ("2", "2020-01-02", "30:00"),
            ("3", "2020-01-03", DNP),
            ("4", "2020-01-04", "Inactive"),
            ("5", "2020-01-05", "30:00"),
            ("6", "2020-01-06", "Suspended"),
        ]);
        assert_eq!(absence_runs(&e), vec![0..1, 2..4, 5..6]);
    }

    #[test]
    fn test_leading_injury_run_is_not_softened() {
        // Ranks 1-5: four straight absences then a game
        let e = entries(&[
            ("1", "2020-01-01", DNP),
            ("2", "2020-01-03", DNP),
            ("3", "2020-01-05", DNP),
            ("4", "2020-01-07", DNP),
            ("5", "2020-01-10", "30:00"),
        ]);
        let result = classify(&e);
        assert_eq!(types(&result), vec![I, I, I, I, N]);
        assert_eq!(days(&result), vec![0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_escalation_sets_gap_on_last_row() {
        let e = entries(&[
            ("1", "2020-01-01", DNP),
            ("2", "2020-01-03", DNP),
            ("3", "2020-01-05", DNP),
            ("4", "2020-01-07", DNP),
            ("5", "2020-01-10", "30:00"),
        ]);
        let escalated = escalate_long_runs(&mark_absences(&e));
        assert_eq!(types(&escalated), vec![I, I, I, I, N]);
        assert_eq!(days(&escalated)[..4].to_vec(), vec![0, 0, 0, 3]);
    }

    #[test]
    fn test_escalation_at_end_of_data_has_zero_gap() {
        let e = entries(&[
            ("1", "2020-01-01", "30:00"),
            ("2", "2020-01-03", DNP),
            ("3", "2020-01-05", DNP),
            ("4", "2020-01-07", DNP),
            ("5", "2020-01-09", DNP),
        ]);
        let escalated = escalate_long_runs(&mark_absences(&e));
        assert_eq!(types(&escalated), vec![N, I, I, I, I]);
        assert_eq!(escalated[4].days_rested, 0);
    }

    #[test]
    fn test_short_runs_stay_load_management() {
        let e = entries(&[
            ("1", "2020-01-01", "30:00"),
            ("2", "2020-01-03", DNP),
            ("3", "2020-01-05", "Did Not Dress"),
            ("4", "2020-01-07", "Inactive"),
            ("5", "2020-01-09", "30:00"),
            ("6", "2020-01-10", "Not With Team"),
            ("7", "2020-01-12", "30:00"),
        ]);
        let result = classify(&e);
        assert_eq!(types(&result), vec![N, L, L, L, N, L, N]);
        assert_eq!(days(&result), vec![0, 0, 0, 0, 8, 0, 3]);
    }

    #[test]
    fn test_mid_season_injury_tail_is_softened_then_absorbed() {
        let e = entries(&[
            ("1", "2020-01-01", "30:00"),
            ("2", "2020-01-03", DNP),
            ("3", "2020-01-05", DNP),
            ("4", "2020-01-07", DNP),
            ("5", "2020-01-09", DNP),
            ("6", "2020-01-11", DNP),
            ("7", "2020-01-13", "30:00"),
        ]);

        let softened = soften_run_tails(&escalate_long_runs(&mark_absences(&e)));
        assert_eq!(types(&softened), vec![N, I, I, L, L, L, N]);

        let result = classify(&e);
        assert_eq!(types(&result), vec![N, I, I, I, I, I, N]);
        assert_eq!(result[6].days_rested, 12);
    }

    #[test]
    fn test_trailing_injury_run_is_not_softened() {
        let e = entries(&[
            ("1", "2020-01-01", "30:00"),
            ("2", "2020-01-03", DNP),
            ("3", "2020-01-05", DNP),
            ("4", "2020-01-07", DNP),
            ("5", "2020-01-09", DNP),
        ]);
        let result = classify(&e);
        assert_eq!(types(&result), vec![N, I, I, I, I]);
    }

    #[test]
    fn test_absorb_adjacent_cascades_both_ways() {
        let mut e = entries(&[
            ("1", "2020-01-01", DNP),
            ("2", "2020-01-02", DNP),
            ("3", "2020-01-03", DNP),
            ("4", "2020-01-04", DNP),
        ]);
        let pattern = [L, I, L, L];
        for (entry, rest_type) in e.iter_mut().zip(pattern) {
            entry.rest_type = rest_type;
        }
        assert_eq!(types(&absorb_adjacent(&e)), vec![I, I, I, I]);

        let pattern = [L, L, L, I];
        for (entry, rest_type) in e.iter_mut().zip(pattern) {
            entry.rest_type = rest_type;
        }
        assert_eq!(types(&absorb_adjacent(&e)), vec![I, I, I, I]);
    }

    #[test]
    fn test_absorb_adjacent_leaves_separated_management_alone() {
        let mut e = entries(&[
            ("1", "2020-01-01", DNP),
            ("2", "2020-01-02", "30:00"),
            ("3", "2020-01-03", DNP),
            ("4", "2020-01-04", DNP),
        ]);
        let pattern = [I, N, L, L];
        for (entry, rest_type) in e.iter_mut().zip(pattern) {
            entry.rest_type = rest_type;
        }
        assert_eq!(types(&absorb_adjacent(&e)), vec![I, N, L, L]);
    }

    #[test]
    fn test_no_management_row_borders_an_injury() {
        let e = entries(&[
            ("1", "2020-01-01", "30:00"),
            ("2", "2020-01-03", DNP),
            ("3", "2020-01-05", DNP),
            ("4", "2020-01-07", DNP),
            ("5", "2020-01-09", DNP),
            ("6", "2020-01-11", DNP),
            ("7", "2020-01-13", "30:00"),
            ("8", "2020-01-15", "Inactive"),
            ("9", "2020-01-17", DNP),
            ("10", "2020-01-19", DNP),
            ("11", "2020-01-21", DNP),
            ("12", "2020-01-23", "30:00"),
        ]);
        let result = classify(&e);
        for pair in result.windows(2) {
            let neighbours = (pair[0].rest_type, pair[1].rest_type);
            assert_ne!(neighbours, (L, I));
            assert_ne!(neighbours, (I, L));
        }
        assert_eq!(types(&result[7..11]), vec![I, I, I, I]);
    }

    #[test]
    fn test_days_rested_reset_at_season_boundary() {
        let e = entries(&[
            ("81", "2020-04-10", "30:00"),
            ("82", "2020-04-12", "30:00"),
            ("1", "2020-10-20", "30:00"),
            ("2", "2020-10-22", "30:00"),
        ]);
        let result = classify(&e);
        assert_eq!(days(&result), vec![0, 2, 0, 2]);
    }

    #[test]
    fn test_days_rested_does_not_reach_into_previous_season() {
        let e = entries(&[
            ("1", "2019-10-20", "30:00"),
            ("1", "2020-10-20", DNP),
            ("2", "2020-10-22", "30:00"),
        ]);
        let result = classify(&e);
        assert_eq!(types(&result), vec![N, L, N]);
        assert_eq!(days(&result), vec![0, 0, 0]);
    }

    #[test]
    fn test_days_rested_spans_absences() {
        let e = entries(&[
            ("1", "2020-01-01", "30:00"),
            ("2", "2020-01-03", "30:00"),
            ("3", "2020-01-05", DNP),
            ("4", "2020-01-08", "30:00"),
        ]);
        let result = classify(&e);
        assert_eq!(days(&result), vec![0, 2, 0, 5]);
    }

    #[test]
    fn test_classification_invariants_over_mixed_log() {
        let e = entries(&[
            ("1", "2019-10-01", DNP),
            ("2", "2019-10-03", "30:00"),
            ("3", "2019-10-05", DNP),
            ("4", "2019-10-07", DNP),
            ("5", "2019-10-09", DNP),
            ("6", "2019-10-11", DNP),
            ("7", "2019-10-13", DNP),
            ("8", "2019-10-15", DNP),
            ("9", "2019-10-17", "12:00"),
            ("10", "2019-10-19", "Player Suspended"),
            ("1", "2020-10-01", "30:00"),
            ("2", "2020-10-03", "Inactive"),
            ("3", "2020-10-05", "30:00"),
        ]);
        let result = classify(&e);

        for (entry, classified) in e.iter().zip(&result) {
            assert!(classified.days_rested >= 0);
            if entry.absent {
                assert_ne!(classified.rest_type, N);
            }
            if classified.rest_type != N || classified.season_opener {
                assert_eq!(classified.days_rested, 0);
            }
        }

        for run in absence_runs(&result) {
            if run.len() <= INJURY_RUN_THRESHOLD {
                assert!(result[run].iter().all(|e| e.rest_type == L));
            } else {
                let head = run.start..run.end - SOFTENED_TAIL_LEN;
                assert!(result[head].iter().all(|e| e.rest_type == I));
            }
        }
        for pair in result.windows(2) {
            let neighbours = [pair[0].rest_type, pair[1].rest_type];
            assert!(!(neighbours.contains(&L) && neighbours.contains(&I)));
        }
    }

    #[test]
    fn test_classify_rows_writes_back() {
        let rows = assign_seasons(TestDataBuilder::rows(&[
            ("1", "2020-01-01", "30:00"),
            ("2", "2020-01-04", "Inactive"),
            ("3", "2020-01-06", "30:00"),
        ]));
        let rows = classify_rows(rows);
        assert_eq!(rows[1].rest_type, L);
        assert_eq!(rows[2].days_rested, 5);
    }
}
