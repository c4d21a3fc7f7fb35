use serde::{Deserialize, Serialize};

use crate::core::{PathCommand, path_length};
use crate::error::{StoryError, StoryResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const TEXT: Color = Color::rgb(0.2, 0.2, 0.2);
    pub const TITLE: Color = Color::rgb(0.133, 0.133, 0.133);
    pub const MUTED: Color = Color::rgb(0.4, 0.4, 0.4);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_rgb24(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f64 / 255.0,
            ((rgb >> 8) & 0xff) as f64 / 255.0,
            (rgb & 0xff) as f64 / 255.0,
        )
    }

    /// Parses `#rrggbb` (case-insensitive).
    pub fn from_hex(hex: &str) -> StoryResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(StoryError::InvalidData(format!(
                "color `{hex}` must be #rrggbb"
            )));
        }
        let channel = |range: std::ops::Range<usize>| -> StoryResult<f64> {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| f64::from(v) / 255.0)
                .map_err(|_| StoryError::InvalidData(format!("color `{hex}` is not hex")))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// `#rrggbb` ignoring alpha.
    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }

    pub fn validate(self) -> StoryResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(StoryError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Dash pattern in pixels (`on, off`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeDash {
    pub on: f64,
    pub off: f64,
}

impl StrokeDash {
    /// Secondary-metric lines (`5 3`).
    pub const SECONDARY: StrokeDash = StrokeDash::new(5.0, 3.0);
    /// Reference baselines (`10 5`).
    pub const REFERENCE: StrokeDash = StrokeDash::new(10.0, 5.0);

    #[must_use]
    pub const fn new(on: f64, off: f64) -> Self {
        Self { on, off }
    }

    fn validate(self) -> StoryResult<()> {
        if !self.on.is_finite() || !self.off.is_finite() || self.on <= 0.0 || self.off < 0.0 {
            return Err(StoryError::InvalidData(
                "dash lengths must be finite, on > 0 and off >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Presentation timing carried on a primitive.
///
/// Backends that cannot animate draw the final state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Animation {
    /// Opacity ramps from 0 to the primitive's opacity.
    FadeIn { delay_ms: u32, duration_ms: u32 },
    /// Stroke is revealed along its length (dash-offset animation).
    DrawIn { delay_ms: u32, duration_ms: u32 },
}

impl Animation {
    #[must_use]
    pub const fn fade_in(delay_ms: u32, duration_ms: u32) -> Self {
        Self::FadeIn {
            delay_ms,
            duration_ms,
        }
    }

    #[must_use]
    pub const fn draw_in(delay_ms: u32, duration_ms: u32) -> Self {
        Self::DrawIn {
            delay_ms,
            duration_ms,
        }
    }

    /// Time after which the primitive is fully shown.
    #[must_use]
    pub const fn end_ms(self) -> u32 {
        match self {
            Self::FadeIn {
                delay_ms,
                duration_ms,
            }
            | Self::DrawIn {
                delay_ms,
                duration_ms,
            } => delay_ms + duration_ms,
        }
    }
}

/// Straight stroke in pixel space (axes, ticks, baselines, legend swatches).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub dash: Option<StrokeDash>,
    pub opacity: f64,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
            dash: None,
            opacity: 1.0,
        }
    }

    #[must_use]
    pub const fn with_dash(mut self, dash: StrokeDash) -> Self {
        self.dash = Some(dash);
        self
    }

    #[must_use]
    pub const fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn validate(self) -> StoryResult<()> {
        if ![self.x1, self.y1, self.x2, self.y2].iter().all(|v| v.is_finite()) {
            return Err(StoryError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(StoryError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        validate_opacity(self.opacity)?;
        if let Some(dash) = self.dash {
            dash.validate()?;
        }
        self.color.validate()
    }
}

/// Smooth series stroke built from path commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathPrimitive {
    pub commands: Vec<PathCommand>,
    pub stroke_width: f64,
    pub color: Color,
    pub dash: Option<StrokeDash>,
    pub animation: Option<Animation>,
    /// Arc length, used as the dash length of a draw-in reveal.
    pub length: f64,
}

impl PathPrimitive {
    #[must_use]
    pub fn new(commands: Vec<PathCommand>, stroke_width: f64, color: Color) -> Self {
        let length = path_length(&commands);
        Self {
            commands,
            stroke_width,
            color,
            dash: None,
            animation: None,
            length,
        }
    }

    #[must_use]
    pub fn with_dash(mut self, dash: Option<StrokeDash>) -> Self {
        self.dash = dash;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: Option<Animation>) -> Self {
        self.animation = animation;
        self
    }

    pub fn validate(&self) -> StoryResult<()> {
        for command in &self.commands {
            let finite = match *command {
                PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => {
                    x.is_finite() && y.is_finite()
                }
                PathCommand::CubicTo {
                    c1x,
                    c1y,
                    c2x,
                    c2y,
                    x,
                    y,
                } => [c1x, c1y, c2x, c2y, x, y].iter().all(|v| v.is_finite()),
            };
            if !finite {
                return Err(StoryError::InvalidData(
                    "path coordinates must be finite".to_owned(),
                ));
            }
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(StoryError::InvalidData(
                "path stroke width must be finite and > 0".to_owned(),
            ));
        }
        if let Some(dash) = self.dash {
            dash.validate()?;
        }
        self.color.validate()
    }
}

/// Data point marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: Color,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn new(cx: f64, cy: f64, radius: f64, fill: Color) -> Self {
        Self {
            cx,
            cy,
            radius,
            fill,
        }
    }

    pub fn validate(self) -> StoryResult<()> {
        if !self.cx.is_finite() || !self.cy.is_finite() {
            return Err(StoryError::InvalidData(
                "circle center must be finite".to_owned(),
            ));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(StoryError::InvalidData(
                "circle radius must be finite and > 0".to_owned(),
            ));
        }
        self.fill.validate()
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        (x - self.cx).hypot(y - self.cy) <= self.radius
    }
}

/// Filled rectangle (bars, era bands, table rows, overlays).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
    pub opacity: f64,
    pub border_width: f64,
    pub border_color: Color,
    pub corner_radius: f64,
    pub animation: Option<Animation>,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
            opacity: 1.0,
            border_width: 0.0,
            border_color: fill_color,
            corner_radius: 0.0,
            animation: None,
        }
    }

    #[must_use]
    pub const fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub const fn with_border(mut self, width: f64, color: Color) -> Self {
        self.border_width = width;
        self.border_color = color;
        self
    }

    #[must_use]
    pub const fn with_corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    #[must_use]
    pub const fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn validate(self) -> StoryResult<()> {
        if ![self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(StoryError::InvalidData(
                "rect geometry must be finite".to_owned(),
            ));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(StoryError::InvalidData(
                "rect size must be >= 0".to_owned(),
            ));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(StoryError::InvalidData(
                "rect border width must be finite and >= 0".to_owned(),
            ));
        }
        validate_opacity(self.opacity)?;
        self.fill_color.validate()?;
        self.border_color.validate()
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// One label in pixel space. `y` is the baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub bold: bool,
    /// Rotation in degrees around `(x, y)`; vertical axis labels use -90.
    pub rotation_deg: f64,
    pub animation: Option<Animation>,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            bold: false,
            rotation_deg: 0.0,
            animation: None,
        }
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    #[must_use]
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotation_deg = degrees;
        self
    }

    #[must_use]
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn validate(&self) -> StoryResult<()> {
        if self.text.is_empty() {
            return Err(StoryError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() || !self.rotation_deg.is_finite() {
            return Err(StoryError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(StoryError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Rough advance width of `text` for layout decisions made before a backend
/// measures real glyphs (tooltip boxes, legend spacing).
#[must_use]
pub fn estimate_text_width(text: &str, font_size_px: f64, bold: bool) -> f64 {
    let factor = if bold { 0.62 } else { 0.56 };
    text.chars().count() as f64 * font_size_px * factor
}

fn validate_opacity(opacity: f64) -> StoryResult<()> {
    if !opacity.is_finite() || !(0.0..=1.0).contains(&opacity) {
        return Err(StoryError::InvalidData(
            "opacity must be finite and in [0, 1]".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn hex_colors_round_trip() {
        let color = Color::from_hex("#1976d2").expect("hex");
        assert_eq!(color.to_hex(), "#1976d2");
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }
}
