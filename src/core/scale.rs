use serde::{Deserialize, Serialize};

use crate::error::{StoryError, StoryResult};

/// Half-width used to widen a degenerate (`min == max`) domain around zero.
pub const DEGENERATE_DOMAIN_HALF_SPAN: f64 = 0.5;

/// Continuous linear mapping from a numeric domain onto a pixel range.
///
/// The range may be inverted (`range_start > range_end`), which is how value
/// axes put larger values higher on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    /// Builds a scale, widening a degenerate domain instead of failing.
    ///
    /// A zero-width domain `[v, v]` becomes `[v - h, v + h]` with
    /// `h = |v| * 5%`, or [`DEGENERATE_DOMAIN_HALF_SPAN`] when `v == 0`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> StoryResult<Self> {
        let (mut domain_start, mut domain_end) = domain;
        let (range_start, range_end) = range;
        if ![domain_start, domain_end, range_start, range_end]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(StoryError::InvalidData(
                "scale domain and range must be finite".to_owned(),
            ));
        }

        if domain_start == domain_end {
            let half = if domain_start == 0.0 {
                DEGENERATE_DOMAIN_HALF_SPAN
            } else {
                domain_start.abs() * 0.05
            };
            domain_start -= half;
            domain_end += half;
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start,
            range_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    /// Maps a domain value to pixels. Values outside the domain extrapolate.
    #[must_use]
    pub fn map(self, value: f64) -> f64 {
        let t = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.range_start + t * (self.range_end - self.range_start)
    }

    /// Inverse of [`LinearScale::map`]; a zero-width range maps to the domain start.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return self.domain_start;
        }
        let t = (pixel - self.range_start) / span;
        self.domain_start + t * (self.domain_end - self.domain_start)
    }

    /// Evenly spaced "nice" tick values covering the domain.
    #[must_use]
    pub fn ticks(self, target_count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain_start <= self.domain_end {
            (self.domain_start, self.domain_end)
        } else {
            (self.domain_end, self.domain_start)
        };
        let step = nice_step((hi - lo) / target_count.max(1) as f64);
        if step <= 0.0 || !step.is_finite() {
            return vec![lo];
        }

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f64 * step).collect()
    }
}

fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Lower bound policy for a value-axis domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DomainFloor {
    /// Domain starts at zero.
    Zero,
    /// Domain starts at the smallest observed value.
    DataMin,
    /// Domain starts at the smallest observed value times the factor (e.g. 0.95).
    ScaledMin(f64),
}

/// Headroom rule for a value axis: `[floor, max * headroom]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalePadding {
    pub floor: DomainFloor,
    pub headroom: f64,
}

impl ScalePadding {
    #[must_use]
    pub const fn new(floor: DomainFloor, headroom: f64) -> Self {
        Self { floor, headroom }
    }

    #[must_use]
    pub const fn from_zero(headroom: f64) -> Self {
        Self::new(DomainFloor::Zero, headroom)
    }

    /// Dual-range axes: `[min * 0.95, max * headroom]`.
    #[must_use]
    pub const fn dual_range(headroom: f64) -> Self {
        Self::new(DomainFloor::ScaledMin(0.95), headroom)
    }

    fn validate(self) -> StoryResult<Self> {
        let floor_ok = match self.floor {
            DomainFloor::ScaledMin(factor) => factor.is_finite() && factor > 0.0,
            DomainFloor::Zero | DomainFloor::DataMin => true,
        };
        if !floor_ok || !self.headroom.is_finite() || self.headroom <= 0.0 {
            return Err(StoryError::InvalidData(
                "scale padding factors must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

impl Default for ScalePadding {
    fn default() -> Self {
        Self::new(DomainFloor::DataMin, 1.1)
    }
}

/// Min/max over finite values; `None` when there are none.
#[must_use]
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Builds a value scale from observed values using a padding rule.
///
/// Returns `Ok(None)` for an empty value set; callers render an empty state
/// rather than drawing on a made-up domain.
pub fn build_linear_scale<I>(
    values: I,
    padding: ScalePadding,
    pixel_range: (f64, f64),
) -> StoryResult<Option<LinearScale>>
where
    I: IntoIterator<Item = f64>,
{
    let padding = padding.validate()?;
    let Some((min, max)) = extent(values) else {
        return Ok(None);
    };

    let start = match padding.floor {
        DomainFloor::Zero => 0.0,
        DomainFloor::DataMin => min,
        DomainFloor::ScaledMin(factor) => min * factor,
    };
    LinearScale::new((start, max * padding.headroom), pixel_range).map(Some)
}

/// Horizontal year scale over the exact extent of the given years (no padding).
pub fn build_year_scale<I>(years: I, pixel_range: (f64, f64)) -> StoryResult<Option<LinearScale>>
where
    I: IntoIterator<Item = f64>,
{
    match extent(years) {
        Some((min, max)) => LinearScale::new((min, max), pixel_range).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::{DomainFloor, LinearScale, ScalePadding, build_linear_scale, nice_step};

    #[test]
    fn degenerate_domain_is_widened_around_value() {
        let scale = LinearScale::new((10.0, 10.0), (0.0, 100.0)).expect("scale");
        assert_eq!(scale.domain(), (9.5, 10.5));
        assert!((scale.map(10.0) - 50.0).abs() <= 1e-9);

        let zero = LinearScale::new((0.0, 0.0), (0.0, 100.0)).expect("scale");
        assert_eq!(zero.domain(), (-0.5, 0.5));
    }

    #[test]
    fn nice_step_rounds_up_to_one_two_five_ladder() {
        assert_eq!(nice_step(1.0), 1.0);
        assert_eq!(nice_step(1.3), 2.0);
        assert_eq!(nice_step(3.7), 5.0);
        assert_eq!(nice_step(7.0), 10.0);
    }

    #[test]
    fn scaled_min_floor_is_applied() {
        let scale = build_linear_scale(
            [0.30, 0.40],
            ScalePadding::new(DomainFloor::ScaledMin(0.95), 1.05),
            (300.0, 0.0),
        )
        .expect("build")
        .expect("non-empty");
        let (lo, hi) = scale.domain();
        assert!((lo - 0.285).abs() <= 1e-12);
        assert!((hi - 0.42).abs() <= 1e-12);
    }
}
