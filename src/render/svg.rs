use std::fmt::Write as _;

use crate::core::PathCommand;
use crate::error::{StoryError, StoryResult};
use crate::render::{
    Animation, CirclePrimitive, Color, LinePrimitive, PathPrimitive, Primitive, RectPrimitive,
    RenderFrame, Renderer, StrokeDash, TextHAlign, TextPrimitive,
};

const FONT_FAMILY: &str = "Arial, sans-serif";

/// Serializes frames into standalone SVG documents.
///
/// Animations become SMIL `<animate>` elements unless disabled, in which case
/// every primitive is written in its final state.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    animate: bool,
    background: Color,
    document: String,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            animate: true,
            background: Color::WHITE,
            document: String::new(),
        }
    }

    #[must_use]
    pub fn with_animations(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn with_background(mut self, background: Color) -> StoryResult<Self> {
        background.validate()?;
        self.background = background;
        Ok(self)
    }

    /// Last rendered document; empty before the first frame.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn take_document(&mut self) -> String {
        std::mem::take(&mut self.document)
    }

    /// Renders `frame` without touching renderer state.
    pub fn to_svg(&self, frame: &RenderFrame) -> StoryResult<String> {
        frame.validate()?;
        let mut out = String::with_capacity(4096);
        self.write_document(&mut out, frame)
            .map_err(|err| StoryError::InvalidData(format!("svg serialization failed: {err}")))?;
        Ok(out)
    }

    fn write_document(&self, out: &mut String, frame: &RenderFrame) -> std::fmt::Result {
        let (width, height) = (frame.viewport.width, frame.viewport.height);
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{FONT_FAMILY}">"#
        )?;
        writeln!(
            out,
            r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{}"{}/>"#,
            self.background.to_hex(),
            alpha_attr("fill-opacity", self.background.alpha)
        )?;
        for primitive in frame.primitives() {
            match primitive {
                Primitive::Line(line) => self.write_line(out, line)?,
                Primitive::Path(path) => self.write_path(out, path)?,
                Primitive::Circle(circle) => write_circle(out, circle)?,
                Primitive::Rect(rect) => self.write_rect(out, rect)?,
                Primitive::Text(text) => self.write_text(out, text)?,
            }
        }
        writeln!(out, "</svg>")
    }

    fn write_line(&self, out: &mut String, line: &LinePrimitive) -> std::fmt::Result {
        write!(
            out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"{}{}{}"#,
            num(line.x1),
            num(line.y1),
            num(line.x2),
            num(line.y2),
            line.color.to_hex(),
            num(line.stroke_width),
            alpha_attr("stroke-opacity", line.color.alpha),
            dash_attr(line.dash),
            alpha_attr("opacity", line.opacity),
        )?;
        writeln!(out, "/>")
    }

    fn write_path(&self, out: &mut String, path: &PathPrimitive) -> std::fmt::Result {
        write!(
            out,
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="{}"{}"#,
            path_data(&path.commands),
            path.color.to_hex(),
            num(path.stroke_width),
            alpha_attr("stroke-opacity", path.color.alpha),
        )?;
        let animation = path.animation.filter(|_| self.animate);
        match (animation, path.dash) {
            // A dashed stroke cannot also be revealed through its dash array.
            (Some(Animation::DrawIn { .. }), None) => {
                let length = num(path.length);
                write!(
                    out,
                    r#" stroke-dasharray="{length} {length}" stroke-dashoffset="{length}""#
                )?;
            }
            (Some(_), dash) => write!(out, r#"{} opacity="0""#, dash_attr(dash))?,
            (None, dash) => write!(out, "{}", dash_attr(dash))?,
        }
        match animation {
            Some(Animation::DrawIn {
                delay_ms,
                duration_ms,
            }) if path.dash.is_none() => {
                writeln!(out, ">")?;
                writeln!(
                    out,
                    r#"<animate attributeName="stroke-dashoffset" from="{}" to="0" begin="{delay_ms}ms" dur="{duration_ms}ms" fill="freeze"/>"#,
                    num(path.length)
                )?;
                writeln!(out, "</path>")
            }
            Some(animation) => {
                writeln!(out, ">")?;
                write_fade(out, animation, 1.0)?;
                writeln!(out, "</path>")
            }
            None => writeln!(out, "/>"),
        }
    }

    fn write_rect(&self, out: &mut String, rect: &RectPrimitive) -> std::fmt::Result {
        write!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"{}"#,
            num(rect.x),
            num(rect.y),
            num(rect.width),
            num(rect.height),
            rect.fill_color.to_hex(),
            alpha_attr("fill-opacity", rect.fill_color.alpha),
        )?;
        if rect.corner_radius > 0.0 {
            write!(out, r#" rx="{}""#, num(rect.corner_radius))?;
        }
        if rect.border_width > 0.0 {
            write!(
                out,
                r#" stroke="{}" stroke-width="{}""#,
                rect.border_color.to_hex(),
                num(rect.border_width)
            )?;
        }
        match rect.animation.filter(|_| self.animate) {
            Some(animation) => {
                writeln!(out, r#" opacity="0">"#)?;
                write_fade(out, animation, rect.opacity)?;
                writeln!(out, "</rect>")
            }
            None => writeln!(out, "{}/>", alpha_attr("opacity", rect.opacity)),
        }
    }

    fn write_text(&self, out: &mut String, text: &TextPrimitive) -> std::fmt::Result {
        let anchor = match text.h_align {
            TextHAlign::Left => "start",
            TextHAlign::Center => "middle",
            TextHAlign::Right => "end",
        };
        write!(
            out,
            r#"<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="{anchor}""#,
            num(text.x),
            num(text.y),
            num(text.font_size_px),
            text.color.to_hex(),
        )?;
        if text.bold {
            write!(out, r#" font-weight="bold""#)?;
        }
        if text.rotation_deg != 0.0 {
            write!(
                out,
                r#" transform="rotate({} {} {})""#,
                num(text.rotation_deg),
                num(text.x),
                num(text.y)
            )?;
        }
        match text.animation.filter(|_| self.animate) {
            Some(animation) => {
                write!(out, r#" opacity="0">{}"#, escape_xml(&text.text))?;
                write_fade(out, animation, 1.0)?;
                writeln!(out, "</text>")
            }
            None => writeln!(out, ">{}</text>", escape_xml(&text.text)),
        }
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> StoryResult<()> {
        self.document = self.to_svg(frame)?;
        Ok(())
    }
}

fn write_circle(out: &mut String, circle: &CirclePrimitive) -> std::fmt::Result {
    writeln!(
        out,
        r#"<circle cx="{}" cy="{}" r="{}" fill="{}"{}/>"#,
        num(circle.cx),
        num(circle.cy),
        num(circle.radius),
        circle.fill.to_hex(),
        alpha_attr("fill-opacity", circle.fill.alpha),
    )
}

fn write_fade(out: &mut String, animation: Animation, target: f64) -> std::fmt::Result {
    let (delay_ms, duration_ms) = match animation {
        Animation::FadeIn {
            delay_ms,
            duration_ms,
        }
        | Animation::DrawIn {
            delay_ms,
            duration_ms,
        } => (delay_ms, duration_ms),
    };
    writeln!(
        out,
        r#"<animate attributeName="opacity" from="0" to="{}" begin="{delay_ms}ms" dur="{duration_ms}ms" fill="freeze"/>"#,
        num(target)
    )
}

fn path_data(commands: &[PathCommand]) -> String {
    let mut data = String::new();
    for command in commands {
        // Writing into a String cannot fail.
        let _ = match *command {
            PathCommand::MoveTo { x, y } => write!(data, "M{},{}", num(x), num(y)),
            PathCommand::LineTo { x, y } => write!(data, "L{},{}", num(x), num(y)),
            PathCommand::CubicTo {
                c1x,
                c1y,
                c2x,
                c2y,
                x,
                y,
            } => write!(
                data,
                "C{},{},{},{},{},{}",
                num(c1x),
                num(c1y),
                num(c2x),
                num(c2y),
                num(x),
                num(y)
            ),
        };
    }
    data
}

fn dash_attr(dash: Option<StrokeDash>) -> String {
    dash.map(|dash| {
        format!(
            r#" stroke-dasharray="{} {}""#,
            num(dash.on),
            num(dash.off)
        )
    })
    .unwrap_or_default()
}

fn alpha_attr(name: &str, value: f64) -> String {
    if value >= 1.0 {
        String::new()
    } else {
        format!(r#" {name}="{}""#, num(value))
    }
}

/// Compact decimal form: at most three fractional digits, no trailing zeros.
fn num(value: f64) -> String {
    let mut text = format!("{value:.3}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" { "0".to_owned() } else { text }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape_xml, num};

    #[test]
    fn numbers_are_compact() {
        assert_eq!(num(12.0), "12");
        assert_eq!(num(12.5), "12.5");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(1.23456), "1.235");
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape_xml("3P% <&>"), "3P% &lt;&amp;&gt;");
    }
}
