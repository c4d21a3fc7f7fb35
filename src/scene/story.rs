//! The six scenes of the three-point story.

use crate::chart::{AxisSide, EraBand, LegendEntry, SeriesStyle, TickFormat, TickSpec};
use crate::core::ScalePadding;
use crate::data::{DerivedField, RowPredicate, SourceTable, StatField, YearRange};
use crate::render::{Animation, Color, StrokeDash, TextHAlign};

use super::config::{
    AxisRule, CalloutSpec, ChartSceneConfig, DashboardConfig, DatasetSpec, FieldRef,
    LeaderboardConfig, ReferenceSpec, SceneConfig, SceneKind, SeriesSpec, TooltipLine, XDomain,
};

pub const PRIMARY_BLUE: Color = Color::from_rgb24(0x1976d2);
pub const AMBER: Color = Color::from_rgb24(0xffb300);
pub const GREEN: Color = Color::from_rgb24(0x43a047);
pub const LEAGUE_GRAY: Color = Color::from_rgb24(0x888888);
pub const WARRIORS_BLUE: Color = Color::from_rgb24(0x4285f4);
pub const ROCKETS_RED: Color = Color::from_rgb24(0xdb4437);

const THREE_PA: StatField = StatField::ThreePointAttempts;
const TWO_PA: StatField = StatField::TwoPointAttempts;
const THREE_PCT: StatField = StatField::ThreePointPct;
const MINUTES: StatField = StatField::MinutesPlayed;

/// Scenes with the default leaderboard settings.
#[must_use]
pub fn story() -> Vec<SceneConfig> {
    story_with(LeaderboardConfig::default())
}

#[must_use]
pub fn story_with(leaderboards: LeaderboardConfig) -> Vec<SceneConfig> {
    vec![
        league_trend(),
        shortened_line(),
        seven_seconds(),
        revolution(),
        boom(),
        dashboard(leaderboards),
    ]
}

fn league_with_two_point() -> crate::data::ColumnMapping {
    SourceTable::League
        .mapping()
        .with_derived(DerivedField::TwoPointAttempts)
}

fn staggered(delay_ms: u32) -> Animation {
    Animation::draw_in(delay_ms, 1000)
}

fn league_trend() -> SceneConfig {
    let chart = ChartSceneConfig {
        x_label: "Season".to_owned(),
        y_label: "3PA per Game".to_owned(),
        y2_label: None,
        datasets: vec![DatasetSpec::new(
            "league",
            SourceTable::League,
            RowPredicate::years(YearRange::from(1980)).requiring(&[THREE_PA]),
        )],
        x_domain: XDomain::Data(vec!["league".to_owned()]),
        x_ticks: TickSpec::Auto(10),
        left: AxisRule::new(
            vec![FieldRef::new("league", THREE_PA)],
            ScalePadding::from_zero(1.1),
            TickFormat::Number,
        ),
        right: None,
        series: vec![
            SeriesSpec::new(
                "3PA",
                "league",
                THREE_PA,
                AxisSide::Left,
                SeriesStyle::solid(PRIMARY_BLUE)
                    .with_points(4.0, AMBER)
                    .with_reveal(Animation::draw_in(0, 1500)),
            )
            .with_tooltip(vec![
                TooltipLine::stat("3PA", THREE_PA),
                TooltipLine::stat("3P%", THREE_PCT),
            ]),
        ],
        bands: Vec::new(),
        references: Vec::new(),
        callouts: vec![
            CalloutSpec::new(
                "1979-80",
                "3-point line introduced",
                (0.0, -60.0),
                TextHAlign::Center,
            ),
            CalloutSpec::new(
                "1994-95",
                "Line shortened (1994-97)",
                (40.0, -40.0),
                TextHAlign::Left,
            ),
            CalloutSpec::new(
                "2015-16",
                "3-point boom (2015+)",
                (60.0, -50.0),
                TextHAlign::Right,
            ),
        ],
        legend: Vec::new(),
        legend_reveal: None,
    };
    SceneConfig {
        title: "NBA League Average 3-Point Attempts per Game (1980\u{2013}Present)".to_owned(),
        narrative: "The NBA introduced the 3-point line in 1979-80. Since then, 3-point attempts \
                    have steadily increased, with major jumps in the mid-1990s and the 2010s. \
                    Hover over points for details."
            .to_owned(),
        sources: vec![SourceTable::League],
        kind: SceneKind::Chart(Box::new(chart)),
    }
}

fn shortened_line() -> SceneConfig {
    let chart = ChartSceneConfig {
        x_label: "Season".to_owned(),
        y_label: "Attempts per Game (Left Axis)".to_owned(),
        y2_label: Some("3P% (Right Axis)".to_owned()),
        datasets: vec![
            DatasetSpec::new(
                "league",
                SourceTable::League,
                RowPredicate::years(YearRange::between(1990, 2000))
                    .requiring(&[THREE_PA, THREE_PCT, TWO_PA]),
            )
            .with_mapping(league_with_two_point()),
        ],
        x_domain: XDomain::Data(vec!["league".to_owned()]),
        x_ticks: TickSpec::stepped(1990, 2000, 2),
        left: AxisRule::new(
            vec![
                FieldRef::new("league", THREE_PA),
                FieldRef::new("league", TWO_PA),
            ],
            ScalePadding::from_zero(1.1),
            TickFormat::Number,
        ),
        right: Some(AxisRule::new(
            vec![FieldRef::new("league", THREE_PCT)],
            ScalePadding::from_zero(1.15),
            TickFormat::WholePercent,
        )),
        series: vec![
            SeriesSpec::new(
                "3PA",
                "league",
                THREE_PA,
                AxisSide::Left,
                SeriesStyle::solid(PRIMARY_BLUE)
                    .with_points(5.0, PRIMARY_BLUE)
                    .with_reveal(staggered(500)),
            )
            .with_tooltip(vec![TooltipLine::stat("3PA", THREE_PA)]),
            SeriesSpec::new(
                "2PA",
                "league",
                TWO_PA,
                AxisSide::Left,
                SeriesStyle::solid(GREEN)
                    .with_points(5.0, GREEN)
                    .with_reveal(staggered(1000)),
            )
            .with_tooltip(vec![TooltipLine::stat("2PA", TWO_PA)]),
            SeriesSpec::new(
                "3P%",
                "league",
                THREE_PCT,
                AxisSide::Right,
                SeriesStyle::solid(AMBER)
                    .dashed(StrokeDash::SECONDARY)
                    .with_points(5.0, AMBER)
                    .with_reveal(staggered(1500)),
            )
            .with_tooltip(vec![TooltipLine::stat("3P%", THREE_PCT)]),
        ],
        bands: vec![EraBand::new(1994, 1997, "3PT Line Shortened", AMBER)],
        references: Vec::new(),
        callouts: Vec::new(),
        legend: vec![
            LegendEntry::new(PRIMARY_BLUE, "3PA (Left Axis)"),
            LegendEntry::new(GREEN, "2PA (Left Axis)"),
            LegendEntry::new(AMBER, "3P% (Right Axis)").dashed(StrokeDash::SECONDARY),
        ],
        legend_reveal: Some(Animation::fade_in(3500, 500)),
    };
    SceneConfig {
        title: "NBA 3PA, 2PA, and 3P% (1990\u{2013}2000)".to_owned(),
        narrative: "From 1994\u{2013}1997, the NBA shortened the 3-point line to encourage more \
                    attempts. This chart compares 3PA, 2PA, and 3P% during the 1990s. Hover over \
                    points for details."
            .to_owned(),
        sources: vec![SourceTable::League],
        kind: SceneKind::Chart(Box::new(chart)),
    }
}

fn seven_seconds() -> SceneConfig {
    let years = YearRange::between(2000, 2010);
    let chart = ChartSceneConfig {
        x_label: "Season".to_owned(),
        y_label: "3PA (Left Axis)".to_owned(),
        y2_label: Some("3P% (Right Axis)".to_owned()),
        datasets: vec![
            DatasetSpec::new(
                "suns",
                SourceTable::Suns,
                RowPredicate::years(years).requiring(&[THREE_PA, THREE_PCT, MINUTES]),
            ),
            DatasetSpec::new(
                "league",
                SourceTable::League,
                RowPredicate::years(years).requiring(&[THREE_PA]),
            ),
        ],
        x_domain: XDomain::Data(vec!["suns".to_owned()]),
        x_ticks: TickSpec::stepped(2000, 2010, 2),
        left: AxisRule::new(
            vec![
                FieldRef::new("suns", THREE_PA),
                FieldRef::new("league", THREE_PA),
            ],
            ScalePadding::from_zero(1.1),
            TickFormat::Number,
        ),
        right: Some(AxisRule::new(
            vec![FieldRef::new("suns", THREE_PCT)],
            ScalePadding::dual_range(1.05),
            TickFormat::WholePercent,
        )),
        series: vec![
            SeriesSpec::new(
                "Suns 3PA",
                "suns",
                THREE_PA,
                AxisSide::Left,
                SeriesStyle::solid(PRIMARY_BLUE)
                    .with_points(5.0, PRIMARY_BLUE)
                    .with_reveal(staggered(500)),
            )
            .with_tooltip(vec![
                TooltipLine::stat("Suns 3PA", THREE_PA),
                TooltipLine::stat("MP", MINUTES),
            ]),
            SeriesSpec::new(
                "League Avg 3PA",
                "league",
                THREE_PA,
                AxisSide::Left,
                SeriesStyle::solid(LEAGUE_GRAY)
                    .with_points(5.0, LEAGUE_GRAY)
                    .with_reveal(staggered(1000)),
            )
            .with_tooltip(vec![TooltipLine::stat("League Avg 3PA", THREE_PA)]),
            SeriesSpec::new(
                "Suns 3P%",
                "suns",
                THREE_PCT,
                AxisSide::Right,
                SeriesStyle::solid(AMBER)
                    .dashed(StrokeDash::SECONDARY)
                    .with_points(5.0, AMBER)
                    .with_reveal(staggered(1500)),
            )
            .with_tooltip(vec![
                TooltipLine::stat("3P%", THREE_PCT),
                TooltipLine::stat("MP", MINUTES),
            ]),
        ],
        bands: vec![EraBand::new(2004, 2010, "7 Seconds or Less Era", PRIMARY_BLUE)],
        references: Vec::new(),
        callouts: Vec::new(),
        legend: vec![
            LegendEntry::new(PRIMARY_BLUE, "Suns 3PA (Left Axis)"),
            LegendEntry::new(LEAGUE_GRAY, "League Avg 3PA (Left Axis)"),
            LegendEntry::new(AMBER, "Suns 3P% (Right Axis)").dashed(StrokeDash::SECONDARY),
        ],
        legend_reveal: Some(Animation::fade_in(3500, 500)),
    };
    SceneConfig {
        title: "Phoenix Suns vs. League: 3PA and 3P% (2000\u{2013}2010)".to_owned(),
        narrative: "From 2004-2010, the Suns popularized the \"7 seconds or less\" offense, \
                    playing at a fast pace and shooting more threes. This chart compares Suns \
                    3PA, league average 3PA, and Suns 3P%. Hover over points for details. \
                    Minutes played (MP) is shown in the tooltip for Suns."
            .to_owned(),
        sources: vec![SourceTable::Suns, SourceTable::League],
        kind: SceneKind::Chart(Box::new(chart)),
    }
}

fn revolution() -> SceneConfig {
    let predicate = RowPredicate::years(YearRange::between(2015, 2020)).requiring(&[THREE_PA, THREE_PCT]);
    let teams = [
        ("warriors", "Warriors", SourceTable::Warriors, WARRIORS_BLUE),
        ("rockets", "Rockets", SourceTable::Rockets, ROCKETS_RED),
        ("league", "League Avg", SourceTable::League, LEAGUE_GRAY),
    ];

    let mut series = Vec::with_capacity(6);
    let mut legend = Vec::with_capacity(6);
    for (key, name, _, color) in teams {
        series.push(
            SeriesSpec::new(
                format!("{name} 3PA"),
                key,
                THREE_PA,
                AxisSide::Left,
                SeriesStyle::solid(color).with_points(5.0, color),
            )
            .with_tooltip(vec![TooltipLine::stat(format!("{name} 3PA"), THREE_PA)]),
        );
        legend.push(LegendEntry::new(color, format!("{name} 3PA (Left Axis)")).with_stroke_width(2.0));
    }
    for (key, name, _, color) in teams {
        series.push(
            SeriesSpec::new(
                format!("{name} 3P%"),
                key,
                THREE_PCT,
                AxisSide::Right,
                SeriesStyle::solid(color)
                    .dashed(StrokeDash::SECONDARY)
                    .with_points(4.0, color),
            )
            .with_tooltip(vec![TooltipLine::stat(format!("{name} 3P%"), THREE_PCT)]),
        );
        legend.push(
            LegendEntry::new(color, format!("{name} 3P% (Right Axis)"))
                .dashed(StrokeDash::SECONDARY)
                .with_stroke_width(2.0),
        );
    }
    for (position, spec) in series.iter_mut().enumerate() {
        spec.style = spec.style.with_reveal(staggered(500 + 250 * position as u32));
    }

    let chart = ChartSceneConfig {
        x_label: "Season".to_owned(),
        y_label: "3PA (Left Axis)".to_owned(),
        y2_label: Some("3P% (Right Axis)".to_owned()),
        datasets: teams
            .iter()
            .map(|(key, _, table, _)| DatasetSpec::new(*key, *table, predicate.clone()))
            .collect(),
        x_domain: XDomain::Data(vec!["warriors".to_owned()]),
        x_ticks: TickSpec::stepped(2015, 2020, 1),
        left: AxisRule::new(
            teams
                .iter()
                .map(|(key, ..)| FieldRef::new(*key, THREE_PA))
                .collect(),
            ScalePadding::from_zero(1.2),
            TickFormat::Number,
        ),
        right: Some(AxisRule::new(
            teams
                .iter()
                .map(|(key, ..)| FieldRef::new(*key, THREE_PCT))
                .collect(),
            ScalePadding::dual_range(1.15),
            TickFormat::WholePercent,
        )),
        series,
        bands: vec![EraBand::new(2015, 2020, "3-Point Revolution Era", WARRIORS_BLUE)],
        references: Vec::new(),
        callouts: Vec::new(),
        legend,
        legend_reveal: Some(Animation::fade_in(3500, 500)),
    };
    SceneConfig {
        title: "Warriors & Rockets vs. League: 3PA and 3P% (2015\u{2013}2020)".to_owned(),
        narrative: "From 2015\u{2013}2020, the Warriors and Rockets led the 3-point revolution. \
                    The Warriors won championships with their \"Splash Brothers\" backcourt, \
                    while the Rockets pioneered \"Moreyball\" with high-volume 3-point shooting. \
                    Both teams consistently shot more threes than the league average. Hover over \
                    points for details."
            .to_owned(),
        sources: vec![SourceTable::Warriors, SourceTable::Rockets, SourceTable::League],
        kind: SceneKind::Chart(Box::new(chart)),
    }
}

fn boom() -> SceneConfig {
    let required = [THREE_PA, TWO_PA, THREE_PCT];
    let stats = [
        ("3PA", THREE_PA, AxisSide::Left, PRIMARY_BLUE),
        ("2PA", TWO_PA, AxisSide::Left, GREEN),
        ("3P%", THREE_PCT, AxisSide::Right, AMBER),
    ];

    let references: Vec<ReferenceSpec> = stats
        .iter()
        .map(|(name, field, axis, color)| ReferenceSpec {
            source: FieldRef::new("baseline", *field),
            axis: *axis,
            label: format!("2000-2004 Avg {name}"),
            color: *color,
        })
        .collect();

    let series = stats
        .iter()
        .enumerate()
        .map(|(reference, (name, field, axis, color))| {
            let mut style = SeriesStyle::solid(*color)
                .with_points(4.0, *color)
                .with_reveal(staggered(500 * (reference as u32 + 1)));
            if *axis == AxisSide::Right {
                style = style.dashed(StrokeDash::SECONDARY);
            }
            SeriesSpec::new(*name, "current", *field, *axis, style).with_tooltip(vec![
                TooltipLine::stat(*name, *field),
                TooltipLine::baseline("2000-2004 Avg", reference),
            ])
        })
        .collect();

    let mut legend: Vec<LegendEntry> = stats
        .iter()
        .map(|(name, _, axis, color)| {
            let side = match axis {
                AxisSide::Left => "Left",
                AxisSide::Right => "Right",
            };
            let entry = LegendEntry::new(*color, format!("{name} ({side} Axis)"));
            if *axis == AxisSide::Right {
                entry.dashed(StrokeDash::SECONDARY)
            } else {
                entry
            }
        })
        .collect();
    legend.extend(stats.iter().map(|(name, _, _, color)| {
        LegendEntry::new(*color, format!("2000-2004 Avg {name}"))
            .dashed(StrokeDash::REFERENCE)
            .with_stroke_width(1.5)
    }));

    let chart = ChartSceneConfig {
        x_label: "Season".to_owned(),
        y_label: "Attempts per Game (Left Axis)".to_owned(),
        y2_label: Some("3P% (Right Axis)".to_owned()),
        datasets: vec![
            DatasetSpec::new(
                "current",
                SourceTable::League,
                RowPredicate::years(YearRange::between(2020, 2024)).requiring(&required),
            )
            .with_mapping(league_with_two_point()),
            DatasetSpec::new(
                "baseline",
                SourceTable::League,
                RowPredicate::years(YearRange::between(2000, 2004)).requiring(&required),
            )
            .with_mapping(league_with_two_point()),
        ],
        x_domain: XDomain::Fixed(2020, 2024),
        x_ticks: TickSpec::stepped(2020, 2024, 1),
        left: AxisRule::new(
            ["current", "baseline"]
                .iter()
                .flat_map(|key| [FieldRef::new(*key, THREE_PA), FieldRef::new(*key, TWO_PA)])
                .collect(),
            ScalePadding::from_zero(1.1),
            TickFormat::Number,
        ),
        right: Some(AxisRule::new(
            vec![
                FieldRef::new("current", THREE_PCT),
                FieldRef::new("baseline", THREE_PCT),
            ],
            ScalePadding::from_zero(1.15),
            TickFormat::WholePercent,
        )),
        series,
        bands: vec![EraBand::new(2020, 2024, "3-Point Boom Era", PRIMARY_BLUE)],
        references,
        callouts: Vec::new(),
        legend,
        legend_reveal: Some(Animation::fade_in(3000, 500)),
    };
    SceneConfig {
        title: "NBA 3-Point Boom: 2020\u{2013}Present (vs. 2000-2004 Reference)".to_owned(),
        narrative: "This chart shows the 3-point boom from 2020-2024 with horizontal reference \
                    lines showing the average values from 2000-2004. The dramatic increase in 3PA \
                    and decrease in 2PA demonstrates how the game has fundamentally changed. \
                    Hover over points to see current values compared to the 2000-2004 averages."
            .to_owned(),
        sources: vec![SourceTable::League],
        kind: SceneKind::Chart(Box::new(chart)),
    }
}

fn dashboard(leaderboards: LeaderboardConfig) -> SceneConfig {
    SceneConfig {
        title: "Interactive 3-Point Dashboard".to_owned(),
        narrative: "Explore the data! Use the year selectors to see different seasons. Click on \
                    players in the top 10 list to see detailed stats. The interactive dashboard \
                    shows real player and team data from your CSV files. Discover who the top \
                    3-point shooters were in different years and how teams ranked in 3-point \
                    shooting."
            .to_owned(),
        sources: vec![
            SourceTable::PlayerShooting,
            SourceTable::PlayerPerGame,
            SourceTable::TeamStats,
        ],
        kind: SceneKind::Dashboard(DashboardConfig {
            leaderboards,
            team_predicate: RowPredicate::years(YearRange::from(2020))
                .requiring(&[THREE_PA, THREE_PCT])
                .requiring_team()
                .excluding_team("League Average")
                .excluding_team("League"),
            preferred_player_year: 2025,
            bar_color: PRIMARY_BLUE,
            note_color: PRIMARY_BLUE,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::story;
    use crate::data::{SeasonRow, StatField};
    use crate::scene::{SceneKind, XDomain};

    #[test]
    fn every_scene_is_internally_consistent() {
        let scenes = story();
        assert_eq!(scenes.len(), 6);
        for scene in &scenes {
            scene.validate().expect("valid scene");
        }
        assert!(matches!(scenes[5].kind, SceneKind::Dashboard(_)));
    }

    #[test]
    fn team_scenes_take_their_x_extent_from_the_featured_team() {
        let scenes = story();
        for (index, key) in [(2, "suns"), (3, "warriors")] {
            let SceneKind::Chart(chart) = &scenes[index].kind else {
                panic!("scene {index} should be a chart");
            };
            assert_eq!(chart.x_domain, XDomain::Data(vec![key.to_owned()]));
        }
    }

    #[test]
    fn boom_window_is_capped_at_its_axis() {
        let scenes = story();
        let SceneKind::Chart(chart) = &scenes[4].kind else {
            panic!("scene 4 should be a chart");
        };
        assert_eq!(chart.x_domain, XDomain::Fixed(2020, 2024));
        let current = &chart.datasets[0];
        let row = |year| {
            SeasonRow::new(year, year.to_string())
                .with_stat(StatField::ThreePointAttempts, 35.0)
                .with_stat(StatField::TwoPointAttempts, 53.0)
                .with_stat(StatField::ThreePointPct, 0.36)
        };
        assert!(current.predicate.matches(&row(2024)));
        assert!(!current.predicate.matches(&row(2025)));
    }
}
