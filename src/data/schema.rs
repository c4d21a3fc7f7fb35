use serde::{Deserialize, Serialize};

use crate::error::{StoryError, StoryResult};

use super::normalize::ColumnMapping;
use super::raw::RawTable;
use super::row::StatField;

/// The source tables the presentation reads, each with a fixed schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceTable {
    League,
    Suns,
    Warriors,
    Rockets,
    TeamStats,
    PlayerShooting,
    PlayerPerGame,
}

impl SourceTable {
    pub const ALL: [SourceTable; 7] = [
        Self::League,
        Self::Suns,
        Self::Warriors,
        Self::Rockets,
        Self::TeamStats,
        Self::PlayerShooting,
        Self::PlayerPerGame,
    ];

    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::League => "league_stats.csv",
            Self::Suns => "suns_pergame.csv",
            Self::Warriors => "warriors_pergame.csv",
            Self::Rockets => "rockets_pergame.csv",
            Self::TeamStats => "Team_Stats_Per_Game.csv",
            Self::PlayerShooting => "Player_Shooting.csv",
            Self::PlayerPerGame => "Player_Per_Game.csv",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::League => "league",
            Self::Suns => "suns",
            Self::Warriors => "warriors",
            Self::Rockets => "rockets",
            Self::TeamStats => "team_stats",
            Self::PlayerShooting => "player_shooting",
            Self::PlayerPerGame => "player_per_game",
        }
    }

    /// Columns that must exist in the header row.
    #[must_use]
    pub const fn required_columns(self) -> &'static [&'static str] {
        match self {
            Self::League => &["Season", "FGA", "3PA", "3P%"],
            Self::Suns | Self::Warriors | Self::Rockets => &["Season", "3PA", "3P%"],
            Self::TeamStats => &[
                "season",
                "team",
                "x3pa_per_game",
                "x3p_percent",
                "x3p_per_game",
            ],
            Self::PlayerShooting => &["season", "player"],
            Self::PlayerPerGame => &[
                "season",
                "player",
                "team",
                "x3pa_per_game",
                "x3p_percent",
            ],
        }
    }

    /// Default column mapping for rows of this table.
    ///
    /// Player rows come from the shooting table joined with the per-game
    /// table, so both share the per-game mapping.
    #[must_use]
    pub fn mapping(self) -> ColumnMapping {
        match self {
            Self::League => ColumnMapping::new("Season")
                .with_stat(StatField::FieldGoalAttempts, "FGA")
                .with_stat(StatField::ThreePointAttempts, "3PA")
                .with_stat(StatField::ThreePointPct, "3P%"),
            Self::Suns | Self::Warriors | Self::Rockets => ColumnMapping::new("Season")
                .with_stat(StatField::ThreePointAttempts, "3PA")
                .with_stat(StatField::ThreePointPct, "3P%")
                .with_stat(StatField::MinutesPlayed, "MP"),
            Self::TeamStats => ColumnMapping::new("season")
                .with_team("team")
                .with_stat(StatField::ThreePointAttempts, "x3pa_per_game")
                .with_stat(StatField::ThreePointPct, "x3p_percent")
                .with_stat(StatField::ThreePointMade, "x3p_per_game"),
            Self::PlayerShooting | Self::PlayerPerGame => ColumnMapping::new("season")
                .with_player("player")
                .with_team("team")
                .with_stat(StatField::ThreePointAttempts, "x3pa_per_game")
                .with_stat(StatField::ThreePointPct, "x3p_percent")
                .with_stat(StatField::ThreePointMade, "x3p_per_game")
                .with_stat(StatField::GamesPlayed, "g")
                .with_stat(StatField::MinutesPlayed, "mp_per_game"),
        }
    }

    /// Checks the header row once at load time.
    pub fn validate(self, table: &RawTable) -> StoryResult<()> {
        for column in self.required_columns() {
            if !table.has_column(column) {
                return Err(StoryError::Schema {
                    table: self.name().to_owned(),
                    column: (*column).to_owned(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SourceTable;
    use crate::data::RawTable;
    use crate::error::StoryError;

    #[test]
    fn missing_required_column_is_a_schema_error() {
        let table = RawTable::from_csv_str("league", "Season,3PA\n1990-91,7.1\n").expect("csv");
        let err = SourceTable::League.validate(&table).expect_err("schema");
        assert!(matches!(err, StoryError::Schema { ref column, .. } if column == "FGA"));
    }
}
