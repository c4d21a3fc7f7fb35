use serde::{Deserialize, Serialize};

/// One drawing command of a smooth path in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    CubicTo {
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    },
}

impl PathCommand {
    #[must_use]
    pub fn end_point(self) -> (f64, f64) {
        match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } | Self::CubicTo { x, y, .. } => (x, y),
        }
    }
}

fn sign(value: f64) -> f64 {
    if value < 0.0 { -1.0 } else { 1.0 }
}

/// Tangent at the middle point of three consecutive samples.
///
/// Steffen-style limiter: zero at local extrema and at most twice the smaller
/// adjacent secant, so the curve stays monotone between samples.
fn interior_tangent(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let h0 = p1.0 - p0.0;
    let h1 = p2.0 - p1.0;
    let s0 = if h0 != 0.0 { (p1.1 - p0.1) / h0 } else { 0.0 };
    let s1 = if h1 != 0.0 { (p2.1 - p1.1) / h1 } else { 0.0 };
    let p = if h0 + h1 != 0.0 {
        (s0 * h1 + s1 * h0) / (h0 + h1)
    } else {
        0.0
    };
    let tangent = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if tangent.is_finite() { tangent } else { 0.0 }
}

/// One-sided tangent at an end point given the neighbouring tangent.
fn end_tangent(p0: (f64, f64), p1: (f64, f64), neighbour: f64) -> f64 {
    let h = p1.0 - p0.0;
    if h == 0.0 {
        neighbour
    } else {
        (3.0 * (p1.1 - p0.1) / h - neighbour) / 2.0
    }
}

/// Builds a monotone-in-x cubic interpolation through `points`.
///
/// Points must be ordered by ascending x. Zero points yield no commands, one
/// point yields a lone `MoveTo`, two points a straight segment.
#[must_use]
pub fn monotone_x_path(points: &[(f64, f64)]) -> Vec<PathCommand> {
    let Some(&(x0, y0)) = points.first() else {
        return Vec::new();
    };
    let mut commands = Vec::with_capacity(points.len());
    commands.push(PathCommand::MoveTo { x: x0, y: y0 });

    match points.len() {
        1 => return commands,
        2 => {
            let (x, y) = points[1];
            commands.push(PathCommand::LineTo { x, y });
            return commands;
        }
        _ => {}
    }

    let n = points.len();
    let mut tangents = vec![0.0; n];
    for i in 1..n - 1 {
        tangents[i] = interior_tangent(points[i - 1], points[i], points[i + 1]);
    }
    tangents[0] = end_tangent(points[0], points[1], tangents[1]);
    tangents[n - 1] = end_tangent(points[n - 2], points[n - 1], tangents[n - 2]);

    for i in 0..n - 1 {
        let (xa, ya) = points[i];
        let (xb, yb) = points[i + 1];
        let dx = (xb - xa) / 3.0;
        commands.push(PathCommand::CubicTo {
            c1x: xa + dx,
            c1y: ya + dx * tangents[i],
            c2x: xb - dx,
            c2y: yb - dx * tangents[i + 1],
            x: xb,
            y: yb,
        });
    }
    commands
}

/// Approximate arc length of a path, flattening cubic segments.
///
/// Used to size dash-offset draw-in animations.
#[must_use]
pub fn path_length(commands: &[PathCommand]) -> f64 {
    const SAMPLES: usize = 16;

    let mut length = 0.0;
    let mut cursor = (0.0, 0.0);
    for command in commands {
        match *command {
            PathCommand::MoveTo { x, y } => cursor = (x, y),
            PathCommand::LineTo { x, y } => {
                length += (x - cursor.0).hypot(y - cursor.1);
                cursor = (x, y);
            }
            PathCommand::CubicTo {
                c1x,
                c1y,
                c2x,
                c2y,
                x,
                y,
            } => {
                let start = cursor;
                let mut previous = start;
                for step in 1..=SAMPLES {
                    let t = step as f64 / SAMPLES as f64;
                    let u = 1.0 - t;
                    let px = u * u * u * start.0
                        + 3.0 * u * u * t * c1x
                        + 3.0 * u * t * t * c2x
                        + t * t * t * x;
                    let py = u * u * u * start.1
                        + 3.0 * u * u * t * c1y
                        + 3.0 * u * t * t * c2y
                        + t * t * t * y;
                    length += (px - previous.0).hypot(py - previous.1);
                    previous = (px, py);
                }
                cursor = (x, y);
            }
        }
    }
    length
}

#[cfg(test)]
mod tests {
    use super::{PathCommand, monotone_x_path, path_length};

    #[test]
    fn collinear_points_produce_straight_cubics() {
        let commands = monotone_x_path(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(commands.len(), 3);
        assert!((path_length(&commands) - 8f64.sqrt()).abs() <= 1e-6);
    }

    #[test]
    fn flat_extremum_gets_zero_tangent() {
        let commands = monotone_x_path(&[(0.0, 0.0), (3.0, 3.0), (6.0, 0.0)]);
        let PathCommand::CubicTo { c2y, y, .. } = commands[1] else {
            panic!("expected cubic");
        };
        assert_eq!(c2y, y);
    }
}
