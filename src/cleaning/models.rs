use chrono::NaiveDate;
use std::fmt;

/// Fixed texts the source puts in the minutes column when a player did not play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbsenceToken {
    DidNotDress,
    Inactive,
    DidNotPlay,
    NotWithTeam,
    Suspended,
    PlayerSuspended,
}

impl AbsenceToken {
    pub const ALL: [AbsenceToken; 6] = [
        AbsenceToken::DidNotDress,
        AbsenceToken::Inactive,
        AbsenceToken::DidNotPlay,
        AbsenceToken::NotWithTeam,
        AbsenceToken::Suspended,
        AbsenceToken::PlayerSuspended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AbsenceToken::DidNotDress => "Did Not Dress",
            AbsenceToken::Inactive => "Inactive",
            AbsenceToken::DidNotPlay => "Did Not Play",
            AbsenceToken::NotWithTeam => "Not With Team",
            AbsenceToken::Suspended => "Suspended",
            AbsenceToken::PlayerSuspended => "Player Suspended",
        }
    }

    /// Exact (whitespace-trimmed) match against the known tokens.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|token| token.as_str() == value)
    }
}

impl fmt::Display for AbsenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn is_absence_token(value: &str) -> bool {
    AbsenceToken::parse(value).is_some()
}

/// Normalized minutes-played value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Minutes {
    /// Decimal minutes, rounded to one place.
    Played(f64),
    Absent(AbsenceToken),
    /// Blank or unparseable source value.
    Missing,
}

impl Minutes {
    pub fn is_absent(&self) -> bool {
        matches!(self, Minutes::Absent(_))
    }
}

impl fmt::Display for Minutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Minutes::Played(minutes) => write!(f, "{minutes:.1}"),
            Minutes::Absent(token) => write!(f, "{token}"),
            Minutes::Missing => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RestType {
    #[default]
    Normal,
    LoadManagement,
    InjuredIllness,
}

impl RestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestType::Normal => "Normal",
            RestType::LoadManagement => "Load Management",
            RestType::InjuredIllness => "Injured/Illness",
        }
    }
}

impl fmt::Display for RestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One game entry of a player's log after normalization.
///
/// `fields` holds every retained source column (already normalized) in the
/// order of `GameLog::columns`; the typed fields are the ones the derived
/// columns are computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRow {
    pub rank: String,
    pub game: Option<u32>,
    pub date: NaiveDate,
    pub age: Option<u32>,
    pub minutes: Minutes,
    /// Cumulative count of season openers up to and including this row.
    pub season_index: i32,
    pub season: String,
    pub rest_type: RestType,
    pub days_rested: i64,
    pub fields: Vec<String>,
}

impl GameRow {
    /// The source numbers games within a season from 1.
    pub fn is_season_opener(&self) -> bool {
        self.rank == "1"
    }
}

/// A player's date-sorted game log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameLog {
    pub columns: Vec<String>,
    pub rows: Vec<GameRow>,
}

impl GameLog {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of a column for the given rows, in row order.
    pub fn column_values<'a>(
        &self,
        name: &str,
        rows: impl IntoIterator<Item = &'a GameRow>,
    ) -> Option<Vec<&'a str>> {
        let idx = self.column_index(name)?;
        Some(
            rows.into_iter()
                .map(|row| row.fields.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }
}

/// Per-season aggregate row.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSummary {
    pub season: String,
    /// `(stat column, custom mean)` in output order.
    pub averages: Vec<(String, Option<f64>)>,
    pub games_played: Option<u32>,
}

impl SeasonSummary {
    pub fn average(&self, column: &str) -> Option<f64> {
        self.averages
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| *value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absence_token_parse() {
        assert_eq!(
            AbsenceToken::parse("Did Not Play"),
            Some(AbsenceToken::DidNotPlay)
        );
        assert_eq!(
            AbsenceToken::parse(" Player Suspended "),
            Some(AbsenceToken::PlayerSuspended)
        );
        assert_eq!(AbsenceToken::parse("did not play"), None);
        assert_eq!(AbsenceToken::parse("32:10"), None);
    }

    #[test]
    fn test_every_token_roundtrips_through_display() {
        for token in AbsenceToken::ALL {
            assert_eq!(AbsenceToken::parse(&token.to_string()), Some(token));
        }
    }

    #[test]
    fn test_minutes_display() {
        assert_eq!(Minutes::Played(35.0).to_string(), "35.0");
        assert_eq!(Minutes::Played(12.5).to_string(), "12.5");
        assert_eq!(
            Minutes::Absent(AbsenceToken::Inactive).to_string(),
            "Inactive"
        );
        assert_eq!(Minutes::Missing.to_string(), "");
    }

    #[test]
    fn test_rest_type_labels() {
        assert_eq!(RestType::Normal.to_string(), "Normal");
        assert_eq!(RestType::LoadManagement.to_string(), "Load Management");
        assert_eq!(RestType::InjuredIllness.to_string(), "Injured/Illness");
        assert_eq!(RestType::default(), RestType::Normal);
    }
}
