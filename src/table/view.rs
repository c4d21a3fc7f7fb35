use serde::{Deserialize, Serialize};

use crate::core::{MISSING_VALUE_LABEL, format_optional_fixed, format_optional_percent};
use crate::interaction::{DatumRef, HoverTarget};
use crate::render::{Color, FrameLayer, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};

use super::TableRow;

const TITLE_FONT_PX: f64 = 14.0;
const CELL_FONT_PX: f64 = 12.0;
const NOTE_FONT_PX: f64 = 11.0;
const ROW_HEIGHT: f64 = 20.0;
const TITLE_GAP: f64 = 12.0;
const HEADER_FILL: Color = Color::rgb(0.961, 0.961, 0.961);
const YEAR_HEADER_FILL: Color = Color::rgb(0.890, 0.949, 0.992);
const HOVER_FILL: Color = Color::rgb(0.945, 0.953, 0.957);

/// Column layout of a leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableColumns {
    /// Rank, Player, Team, 3PA, 3P%, 3PM.
    Players,
    /// Year, Team, 3PA, 3P%, 3PM with a tinted header row per year.
    Teams,
}

impl TableColumns {
    #[must_use]
    pub const fn headers(self) -> &'static [&'static str] {
        match self {
            Self::Players => &["Rank", "Player", "Team", "3PA", "3P%", "3PM"],
            Self::Teams => &["Year", "Team", "3PA", "3P%", "3PM"],
        }
    }

    /// Column widths as fractions of the table width.
    const fn fractions(self) -> &'static [f64] {
        match self {
            Self::Players => &[0.08, 0.34, 0.14, 0.14, 0.15, 0.15],
            Self::Teams => &[0.14, 0.38, 0.16, 0.16, 0.16],
        }
    }

    fn cells(self, row: &TableRow) -> Vec<String> {
        let attempts = format_optional_fixed(row.attempts, 1);
        let pct = format_optional_percent(row.pct, 1);
        let made = format_optional_fixed(row.made, 1);
        match self {
            Self::Players => vec![
                row.rank.to_string(),
                row.entity.clone(),
                row.team
                    .clone()
                    .unwrap_or_else(|| MISSING_VALUE_LABEL.to_owned()),
                attempts,
                pct,
                made,
            ],
            Self::Teams => vec![row.year.to_string(), row.entity.clone(), attempts, pct, made],
        }
    }
}

/// Drawable leaderboard panel.
///
/// Each data row registers a hover target `DatumRef { group, index }` where
/// `index` is the row's position in [`TableView::rows`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub title: String,
    pub columns: TableColumns,
    pub rows: Vec<TableRow>,
    /// Shown below the rows (minimum-volume notice).
    pub note: Option<String>,
    pub note_color: Color,
    /// Shown instead of the rows when there are none.
    pub empty_message: String,
    pub group: usize,
}

impl TableView {
    #[must_use]
    pub fn new(title: impl Into<String>, columns: TableColumns, rows: Vec<TableRow>) -> Self {
        Self {
            title: title.into(),
            columns,
            rows,
            note: None,
            note_color: Color::MUTED,
            empty_message: String::new(),
            group: 0,
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    #[must_use]
    pub fn with_note_color(mut self, color: Color) -> Self {
        self.note_color = color;
        self
    }

    #[must_use]
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    #[must_use]
    pub fn with_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&TableRow> {
        self.rows.get(index)
    }

    /// Year header rows (team layout) interleaved with data rows.
    fn line_count(&self) -> usize {
        let headers = match self.columns {
            TableColumns::Teams => {
                let mut years: Vec<i32> = self.rows.iter().map(|row| row.year).collect();
                years.dedup();
                years.len()
            }
            TableColumns::Players => 0,
        };
        headers + self.rows.len()
    }

    /// Full drawn height including title, header and note.
    #[must_use]
    pub fn height(&self) -> f64 {
        let body = if self.rows.is_empty() {
            ROW_HEIGHT
        } else {
            (self.line_count() + 1) as f64 * ROW_HEIGHT
        };
        let note = if self.note.is_some() { ROW_HEIGHT } else { 0.0 };
        TITLE_GAP + body + note + TITLE_GAP
    }

    /// Draws the panel with its top-left at `origin` and returns row targets.
    ///
    /// Backgrounds go on the background layer so hover tints stay beneath
    /// the cell text.
    pub fn draw(&self, frame: &mut RenderFrame, origin: (f64, f64), width: f64) -> Vec<HoverTarget> {
        let (x, y) = origin;
        frame.push_text(
            FrameLayer::Annotation,
            TextPrimitive::new(
                self.title.clone(),
                x,
                y,
                TITLE_FONT_PX,
                Color::TITLE,
                TextHAlign::Left,
            )
            .bold(),
        );

        let mut top = y + TITLE_GAP;
        if self.rows.is_empty() {
            if !self.empty_message.is_empty() {
                frame.push_text(
                    FrameLayer::Annotation,
                    TextPrimitive::new(
                        self.empty_message.clone(),
                        x,
                        top + ROW_HEIGHT - 6.0,
                        CELL_FONT_PX,
                        Color::MUTED,
                        TextHAlign::Left,
                    ),
                );
            }
            return Vec::new();
        }

        let offsets = column_offsets(self.columns, x, width);
        frame.push_rect(
            FrameLayer::Background,
            RectPrimitive::new(x, top, width, ROW_HEIGHT, HEADER_FILL),
        );
        for (header, column_x) in self.columns.headers().iter().zip(&offsets) {
            frame.push_text(FrameLayer::Annotation, cell(header, *column_x, top).bold());
        }
        top += ROW_HEIGHT;

        let mut targets = Vec::with_capacity(self.rows.len());
        let mut current_year = None;
        for (index, row) in self.rows.iter().enumerate() {
            if self.columns == TableColumns::Teams && current_year != Some(row.year) {
                current_year = Some(row.year);
                frame.push_rect(
                    FrameLayer::Background,
                    RectPrimitive::new(x, top, width, ROW_HEIGHT, YEAR_HEADER_FILL),
                );
                frame.push_text(
                    FrameLayer::Annotation,
                    cell(&row.year.to_string(), x + 6.0, top).bold(),
                );
                top += ROW_HEIGHT;
            }

            for (text, column_x) in self.columns.cells(row).iter().zip(&offsets) {
                frame.push_text(FrameLayer::Annotation, cell(text, *column_x, top));
            }
            targets.push(HoverTarget::row(
                x,
                top,
                width,
                ROW_HEIGHT,
                HOVER_FILL,
                DatumRef::new(self.group, index),
            ));
            top += ROW_HEIGHT;
        }

        if let Some(note) = &self.note {
            frame.push_text(
                FrameLayer::Annotation,
                TextPrimitive::new(
                    note.clone(),
                    x,
                    top + ROW_HEIGHT - 6.0,
                    NOTE_FONT_PX,
                    self.note_color,
                    TextHAlign::Left,
                ),
            );
        }
        targets
    }
}

fn column_offsets(columns: TableColumns, x: f64, width: f64) -> Vec<f64> {
    let mut left = x + 6.0;
    columns
        .fractions()
        .iter()
        .map(|fraction| {
            let column_x = left;
            left += fraction * width;
            column_x
        })
        .collect()
}

fn cell(text: &str, x: f64, row_top: f64) -> TextPrimitive {
    TextPrimitive::new(
        text,
        x,
        row_top + ROW_HEIGHT - 6.0,
        CELL_FONT_PX,
        Color::TEXT,
        TextHAlign::Left,
    )
}

#[cfg(test)]
mod tests {
    use super::{TableColumns, TableView};
    use crate::core::Viewport;
    use crate::render::RenderFrame;
    use crate::table::TableRow;

    fn row(rank: usize, team: &str, year: i32) -> TableRow {
        TableRow {
            rank,
            entity: team.to_owned(),
            team: Some(team.to_owned()),
            year,
            season: format!("{year}"),
            attempts: Some(35.2),
            pct: Some(0.371),
            made: None,
            source_index: rank,
        }
    }

    #[test]
    fn team_layout_adds_one_header_per_year() {
        let view = TableView::new(
            "Top 3PT Shooting Teams (2020-Present)",
            TableColumns::Teams,
            vec![row(1, "A", 2020), row(2, "B", 2020), row(1, "C", 2021)],
        );
        let mut frame = RenderFrame::new(Viewport::new(800, 600));
        let targets = view.draw(&mut frame, (10.0, 20.0), 400.0);

        assert_eq!(targets.len(), 3);
        assert!(frame.contains_text("2021"));
        assert!(frame.contains_text("37.1%"));
        assert!(frame.contains_text("N/A"));
        // Third data row sits below the column header, two year headers and two rows.
        let expected_top = 20.0 + 12.0 + 20.0 * 4.0;
        match targets[2].shape {
            crate::interaction::HitShape::Rect { y, .. } => {
                assert!((y - expected_top).abs() <= 1e-9);
            }
            crate::interaction::HitShape::Circle { .. } => panic!("row target must be a rect"),
        }
    }

    #[test]
    fn empty_view_draws_message_without_targets() {
        let view = TableView::new("Top 10 3PT Shooters", TableColumns::Players, Vec::new())
            .with_empty_message("No player data available for 1990");
        let mut frame = RenderFrame::new(Viewport::new(800, 600));
        assert!(view.draw(&mut frame, (0.0, 0.0), 300.0).is_empty());
        assert!(frame.contains_text("No player data available for 1990"));
    }
}
