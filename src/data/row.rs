use serde::{Deserialize, Serialize};

/// Numeric per-season statistics a scene can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatField {
    FieldGoalAttempts,
    ThreePointAttempts,
    TwoPointAttempts,
    ThreePointPct,
    ThreePointMade,
    MinutesPlayed,
    GamesPlayed,
}

impl StatField {
    pub const COUNT: usize = 7;

    pub const ALL: [StatField; Self::COUNT] = [
        Self::FieldGoalAttempts,
        Self::ThreePointAttempts,
        Self::TwoPointAttempts,
        Self::ThreePointPct,
        Self::ThreePointMade,
        Self::MinutesPlayed,
        Self::GamesPlayed,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::FieldGoalAttempts => 0,
            Self::ThreePointAttempts => 1,
            Self::TwoPointAttempts => 2,
            Self::ThreePointPct => 3,
            Self::ThreePointMade => 4,
            Self::MinutesPlayed => 5,
            Self::GamesPlayed => 6,
        }
    }

    #[must_use]
    pub const fn short_label(self) -> &'static str {
        match self {
            Self::FieldGoalAttempts => "FGA",
            Self::ThreePointAttempts => "3PA",
            Self::TwoPointAttempts => "2PA",
            Self::ThreePointPct => "3P%",
            Self::ThreePointMade => "3PM",
            Self::MinutesPlayed => "MP",
            Self::GamesPlayed => "G",
        }
    }

    /// Whether values are `[0, 1]` fractions rendered as percentages.
    #[must_use]
    pub const fn is_rate(self) -> bool {
        matches!(self, Self::ThreePointPct)
    }
}

/// A typed season record derived from one raw row.
///
/// `year` is the leading four-digit token of `season`. Stats absent in the
/// source (or not requested by the column mapping) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRow {
    pub year: i32,
    pub season: String,
    stats: [Option<f64>; StatField::COUNT],
    pub team: Option<String>,
    pub player: Option<String>,
}

impl SeasonRow {
    #[must_use]
    pub fn new(year: i32, season: impl Into<String>) -> Self {
        Self {
            year,
            season: season.into(),
            stats: [None; StatField::COUNT],
            team: None,
            player: None,
        }
    }

    #[must_use]
    pub fn with_stat(mut self, field: StatField, value: f64) -> Self {
        self.stats[field.index()] = Some(value);
        self
    }

    #[must_use]
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    #[must_use]
    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }

    pub(crate) fn set_stat(&mut self, field: StatField, value: Option<f64>) {
        self.stats[field.index()] = value;
    }

    #[must_use]
    pub fn get(&self, field: StatField) -> Option<f64> {
        self.stats[field.index()]
    }

    #[must_use]
    pub fn has(&self, field: StatField) -> bool {
        self.get(field).is_some()
    }

    /// Label for tables and tooltips: player, then team, then season.
    #[must_use]
    pub fn entity_name(&self) -> &str {
        self.player
            .as_deref()
            .or(self.team.as_deref())
            .unwrap_or(&self.season)
    }
}
