use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chart::{BarChartSpec, BarDatum, ChartOutput, build_bar_chart};
use crate::core::{DomainFloor, MISSING_VALUE_LABEL, PlotArea, Viewport, format_optional_fixed};
use crate::data::{
    Dataset, LoadedTables, RowPredicate, SourceTable, StatField, YearRange, normalize_table,
    player_rows,
};
use crate::error::StoryResult;
use crate::interaction::{DatumRef, ModalDetail, TooltipContent, TooltipProvider};
use crate::render::{Color, FrameLayer, RenderFrame, TextHAlign, TextPrimitive};
use crate::table::{SortMetric, TableColumns, TableRequest, TableRow, TableView, build_table};

use super::config::DashboardConfig;
use super::pipeline::{SceneLayout, format_stat};

/// Hover/click group of the player leaderboard rows.
pub const PLAYER_TABLE_GROUP: usize = 0;
/// Hover group of the team leaderboard rows.
pub const TEAM_TABLE_GROUP: usize = 1;
/// Hover group of the team chart bars.
pub const TEAM_CHART_GROUP: usize = 2;

const PANEL_GAP: f64 = 40.0;
const CONTROL_FONT_PX: f64 = 12.0;
const CHART_HEIGHT: f64 = 220.0;
const CHART_LABEL_SPACE: f64 = 90.0;

/// Selector values of the dashboard. Rebuilt on every scene entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardState {
    pub player_year: Option<i32>,
    pub player_sort: SortMetric,
    pub team_sort: SortMetric,
    pub chart_year: Option<i32>,
    pub chart_sort: SortMetric,
}

/// A selector change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DashboardSelect {
    PlayerYear(i32),
    PlayerSort(SortMetric),
    TeamSort(SortMetric),
    ChartYear(i32),
    ChartSort(SortMetric),
}

impl DashboardState {
    /// Entry selection: the preferred player year when present (else the
    /// latest), the first team year for the chart, every sort on 3PA.
    #[must_use]
    pub fn initial(data: &DashboardData) -> Self {
        Self {
            player_year: data.default_player_year(),
            chart_year: data.team_years().first().copied(),
            ..Self::default()
        }
    }

    /// Applies a selector change. Years that are not offered are ignored.
    pub fn apply(&mut self, select: DashboardSelect, data: &DashboardData) -> bool {
        let before = *self;
        match select {
            DashboardSelect::PlayerYear(year) if data.player_years().contains(&year) => {
                self.player_year = Some(year);
            }
            DashboardSelect::ChartYear(year) if data.team_years().contains(&year) => {
                self.chart_year = Some(year);
            }
            DashboardSelect::PlayerYear(year) | DashboardSelect::ChartYear(year) => {
                warn!(year, ?select, "ignoring selection of a year with no data");
            }
            DashboardSelect::PlayerSort(metric) => self.player_sort = metric,
            DashboardSelect::TeamSort(metric) => self.team_sort = metric,
            DashboardSelect::ChartSort(metric) => self.chart_sort = metric,
        }
        *self != before
    }
}

/// Player and team rows of the dashboard, resolved once per scene entry.
#[derive(Debug, Clone)]
pub struct DashboardData {
    config: DashboardConfig,
    players: Dataset,
    teams: Dataset,
    player_years: Vec<i32>,
    team_years: Vec<i32>,
}

impl DashboardData {
    pub fn from_tables(config: &DashboardConfig, tables: &LoadedTables) -> StoryResult<Self> {
        let joined = player_rows(
            tables.get(SourceTable::PlayerShooting)?,
            tables.get(SourceTable::PlayerPerGame)?,
        );
        let players = Dataset::filter(
            &joined,
            &RowPredicate::years(YearRange::all())
                .requiring(&[StatField::ThreePointPct])
                .requiring_positive(StatField::ThreePointAttempts)
                .requiring_player(),
        );
        let team_rows = normalize_table(
            tables.get(SourceTable::TeamStats)?,
            &SourceTable::TeamStats.mapping(),
        );
        let teams = Dataset::filter(&team_rows, &config.team_predicate);
        Ok(Self::new(config.clone(), players, teams))
    }

    #[must_use]
    pub fn new(config: DashboardConfig, players: Dataset, teams: Dataset) -> Self {
        let player_years = players.distinct_years();
        let team_years = teams.distinct_years();
        debug!(
            players = players.len(),
            teams = teams.len(),
            player_years = player_years.len(),
            team_years = team_years.len(),
            "resolved dashboard data"
        );
        Self {
            config,
            players,
            teams,
            player_years,
            team_years,
        }
    }

    #[must_use]
    pub fn player_years(&self) -> &[i32] {
        &self.player_years
    }

    #[must_use]
    pub fn team_years(&self) -> &[i32] {
        &self.team_years
    }

    #[must_use]
    pub fn players(&self) -> &Dataset {
        &self.players
    }

    #[must_use]
    pub fn teams(&self) -> &Dataset {
        &self.teams
    }

    #[must_use]
    pub fn default_player_year(&self) -> Option<i32> {
        let preferred = self.config.preferred_player_year;
        if self.player_years.contains(&preferred) {
            Some(preferred)
        } else {
            self.player_years.last().copied()
        }
    }

    fn volume_note(&self, entity: &str, min: f64) -> String {
        format!(
            "Note: Only {entity} with {min}+ 3PA per game are shown for meaningful percentage comparisons"
        )
    }

    #[must_use]
    pub fn player_table(&self, state: &DashboardState) -> TableView {
        let limits = self.config.leaderboards;
        let mut request = TableRequest::new(state.player_sort, limits.player_top_n)
            .with_min_volume(limits.player_min_attempts);
        let (rows, empty_message) = match state.player_year {
            Some(year) => {
                request = request.for_year(year);
                (
                    build_table(self.players.rows(), &request),
                    format!("No player data available for {year}"),
                )
            }
            None => (Vec::new(), "No player data available".to_owned()),
        };
        let note = request
            .volume_filter_applies()
            .then(|| self.volume_note("players", limits.player_min_attempts));
        let title = format!("Top {} 3PT Shooters", limits.player_top_n);
        TableView::new(title, TableColumns::Players, rows)
            .with_group(PLAYER_TABLE_GROUP)
            .with_note(note)
            .with_note_color(self.config.note_color)
            .with_empty_message(empty_message)
    }

    #[must_use]
    pub fn team_table(&self, state: &DashboardState) -> TableView {
        let limits = self.config.leaderboards;
        let request = TableRequest::new(state.team_sort, limits.team_top_n)
            .grouped_by_year()
            .with_min_volume(limits.team_min_attempts);
        let note = request
            .volume_filter_applies()
            .then(|| self.volume_note("teams", limits.team_min_attempts));
        TableView::new(
            "Top 3PT Shooting Teams (2020-Present)",
            TableColumns::Teams,
            build_table(self.teams.rows(), &request),
        )
        .with_group(TEAM_TABLE_GROUP)
        .with_note(note)
        .with_note_color(self.config.note_color)
        .with_empty_message("No team data available")
    }

    /// Ranked team rows for the bar chart of the selected year.
    #[must_use]
    pub fn team_bars(&self, state: &DashboardState) -> Vec<TableRow> {
        let limits = self.config.leaderboards;
        let Some(year) = state.chart_year else {
            return Vec::new();
        };
        let request = TableRequest::new(state.chart_sort, limits.team_chart_top_n)
            .for_year(year)
            .with_min_volume(limits.team_min_attempts);
        build_table(self.teams.rows(), &request)
            .into_iter()
            .filter(|row| row.metric(state.chart_sort).is_some())
            .collect()
    }

    /// Rebuilds every panel from the current selection.
    #[must_use]
    pub fn view(&self, state: &DashboardState) -> DashboardView {
        DashboardView {
            state: *state,
            player_table: self.player_table(state),
            team_table: self.team_table(state),
            bars: self.team_bars(state),
            chart_note: state.chart_sort.is_rate().then(|| {
                self.volume_note("teams", self.config.leaderboards.team_min_attempts)
            }),
            chart_top_n: self.config.leaderboards.team_chart_top_n,
            bar_color: self.config.bar_color,
            note_color: self.config.note_color,
        }
    }

    /// Modal content for a player leaderboard row.
    #[must_use]
    pub fn player_detail(&self, row: &TableRow) -> ModalDetail {
        let source = self.players.get(row.source_index);
        let stat = |field: StatField| source.and_then(|player| player.get(field));
        ModalDetail::new(row.entity.clone())
            .field(
                "Team",
                row.team.clone().unwrap_or_else(|| MISSING_VALUE_LABEL.to_owned()),
            )
            .field("Season", row.season.clone())
            .field(
                "3PA per Game",
                format_stat(StatField::ThreePointAttempts, row.attempts),
            )
            .field("3P%", format_stat(StatField::ThreePointPct, row.pct))
            .field(
                "3PM per Game",
                format_stat(StatField::ThreePointMade, row.made),
            )
            .field(
                "Games Played",
                format_optional_fixed(stat(StatField::GamesPlayed), 0),
            )
            .field(
                "Minutes per Game",
                format_stat(StatField::MinutesPlayed, stat(StatField::MinutesPlayed)),
            )
    }
}

/// The three dashboard panels for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub state: DashboardState,
    pub player_table: TableView,
    pub team_table: TableView,
    pub bars: Vec<TableRow>,
    pub chart_note: Option<String>,
    chart_top_n: usize,
    bar_color: Color,
    note_color: Color,
}

impl DashboardView {
    /// Player row behind a click on `datum`, if it is a player row.
    #[must_use]
    pub fn clicked_player(&self, datum: DatumRef) -> Option<&TableRow> {
        (datum.group == PLAYER_TABLE_GROUP)
            .then(|| self.player_table.row(datum.index))
            .flatten()
    }

    fn bar_chart_spec(&self, rest_opacity: f64) -> BarChartSpec {
        let metric = self.state.chart_sort;
        let year = self
            .state
            .chart_year
            .map_or_else(String::new, |year| year.to_string());
        let scale = if metric.is_rate() { 100.0 } else { 1.0 };
        let (floor, headroom) = if metric.is_rate() {
            (DomainFloor::ScaledMin(0.95), 1.05)
        } else {
            (DomainFloor::Zero, 1.05)
        };
        BarChartSpec {
            title: format!(
                "Top {} Teams by {} - {year}",
                self.chart_top_n,
                metric.code()
            ),
            y_label: match metric {
                SortMetric::ThreePointAttempts => "3PA per Game",
                SortMetric::ThreePointPct => "3P% (Whole Numbers)",
                SortMetric::ThreePointMade => "3PM per Game",
            }
            .to_owned(),
            bars: self
                .bars
                .iter()
                .enumerate()
                .filter_map(|(index, row)| {
                    row.metric(metric).map(|value| BarDatum {
                        label: row.entity.clone(),
                        value: value * scale,
                        index,
                    })
                })
                .collect(),
            floor,
            headroom,
            color: self.bar_color,
            rest_opacity,
            group: TEAM_CHART_GROUP,
            empty_message: format!("No team data available for {year}"),
        }
    }

    /// Lays the panels out: player table over the team chart on the left,
    /// team table on the right. The frame grows taller than the layout
    /// viewport when the panels need it.
    pub fn draw(
        &self,
        title: &str,
        layout: SceneLayout,
        rest_opacity: f64,
    ) -> StoryResult<ChartOutput> {
        let width = f64::from(layout.viewport.width);
        let left_x = layout.margins.left.min(PANEL_GAP);
        let column_width = ((width - 3.0 * left_x) / 2.0).max(200.0);
        let right_x = left_x * 2.0 + column_width;
        let panel_top = layout.margins.top + 44.0;

        let player_height = self.player_table.height();
        let chart_controls_y = panel_top + player_height + 20.0;
        let chart_plot_top = chart_controls_y + 56.0;
        let chart_bottom = chart_plot_top + CHART_HEIGHT + CHART_LABEL_SPACE;
        let team_bottom = panel_top + 16.0 + self.team_table.height();
        let height = chart_bottom.max(team_bottom).max(f64::from(layout.viewport.height));
        let viewport = Viewport::new(layout.viewport.width, height.ceil() as u32);

        let mut frame = RenderFrame::new(viewport);
        frame.push_text(
            FrameLayer::Annotation,
            TextPrimitive::new(
                title,
                width / 2.0,
                layout.margins.top,
                17.0,
                Color::TITLE,
                TextHAlign::Center,
            )
            .bold(),
        );

        let year_label =
            |year: Option<i32>| year.map_or_else(|| "-".to_owned(), |year| year.to_string());
        push_control(
            &mut frame,
            left_x,
            panel_top - 20.0,
            format!(
                "Year: {}   Sort by: {}",
                year_label(self.state.player_year),
                self.state.player_sort.option_label()
            ),
        );
        let mut targets = self.player_table.draw(&mut frame, (left_x, panel_top), column_width);

        push_control(
            &mut frame,
            right_x,
            panel_top - 20.0,
            format!("Sort by: {}", self.state.team_sort.option_label()),
        );
        targets.extend(
            self.team_table
                .draw(&mut frame, (right_x, panel_top + 16.0), column_width),
        );

        push_control(
            &mut frame,
            left_x,
            chart_controls_y,
            format!(
                "Team 3PT Performance by Year   Year: {}   Sort by: {}",
                year_label(self.state.chart_year),
                self.state.chart_sort.option_label()
            ),
        );
        if let Some(note) = &self.chart_note {
            frame.push_text(
                FrameLayer::Annotation,
                TextPrimitive::new(
                    note.clone(),
                    left_x,
                    chart_controls_y + 18.0,
                    11.0,
                    self.note_color,
                    TextHAlign::Left,
                ),
            );
        }

        let plot = PlotArea::new(
            left_x + 50.0,
            chart_plot_top,
            column_width - 60.0,
            CHART_HEIGHT,
        )?;
        let chart = build_bar_chart(viewport, plot, &self.bar_chart_spec(rest_opacity))?;
        frame.extend(chart.frame);
        targets.extend(chart.targets);

        Ok(ChartOutput { frame, targets })
    }
}

fn push_control(frame: &mut RenderFrame, x: f64, y: f64, text: String) {
    frame.push_text(
        FrameLayer::Annotation,
        TextPrimitive::new(text, x, y, CONTROL_FONT_PX, Color::TEXT, TextHAlign::Left).bold(),
    );
}

impl TooltipProvider for DashboardView {
    /// Only bars carry tooltips; table rows highlight without one.
    fn tooltip_content(&self, datum: DatumRef) -> Option<TooltipContent> {
        if datum.group != TEAM_CHART_GROUP {
            return None;
        }
        let row = self.bars.get(datum.index)?;
        let mut content = TooltipContent::new(row.entity.clone());
        if self.state.chart_sort == SortMetric::ThreePointMade {
            content = content.field("3PM", &format_stat(StatField::ThreePointMade, row.made));
        }
        Some(
            content
                .field("3PA", &format_stat(StatField::ThreePointAttempts, row.attempts))
                .field("3P%", &format_stat(StatField::ThreePointPct, row.pct)),
        )
    }
}
