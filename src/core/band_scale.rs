use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{StoryError, StoryResult};

/// Categorical scale allocating equal-width slots per category.
///
/// Slot layout follows the usual band-scale convention: `padding` is applied
/// both between bands and at the outer edges, and leftover space is split
/// evenly on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    categories: IndexSet<String>,
    range_start: f64,
    range_end: f64,
    padding: f64,
}

impl BandScale {
    pub fn new<I, S>(categories: I, range: (f64, f64), padding: f64) -> StoryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(StoryError::InvalidData(
                "band scale range must be finite".to_owned(),
            ));
        }
        if !padding.is_finite() || !(0.0..1.0).contains(&padding) {
            return Err(StoryError::InvalidData(
                "band scale padding must be in [0, 1)".to_owned(),
            ));
        }

        Ok(Self {
            categories: categories.into_iter().map(Into::into).collect(),
            range_start: range.0,
            range_end: range.1,
            padding,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[must_use]
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }

    /// Distance between the starts of two adjacent bands.
    #[must_use]
    pub fn step(&self) -> f64 {
        let n = self.categories.len() as f64;
        let slots = (n - self.padding + 2.0 * self.padding).max(1.0);
        (self.range_end - self.range_start) / slots
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Left edge of the band for `category`, `None` for unknown categories.
    #[must_use]
    pub fn position(&self, category: &str) -> Option<f64> {
        let index = self.categories.get_index_of(category)?;
        let n = self.categories.len() as f64;
        let step = self.step();
        let used = step * (n - self.padding);
        let start = self.range_start + (self.range_end - self.range_start - used) * 0.5;
        Some(start + step * index as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::BandScale;

    #[test]
    fn bands_are_evenly_spaced_and_inside_range() {
        let scale = BandScale::new(["A", "B", "C"], (0.0, 310.0), 0.1).expect("band scale");
        let a = scale.position("A").expect("a");
        let b = scale.position("B").expect("b");
        let c = scale.position("C").expect("c");

        assert!((b - a - scale.step()).abs() <= 1e-9);
        assert!((c - b - scale.step()).abs() <= 1e-9);
        assert!(a >= 0.0);
        assert!(c + scale.bandwidth() <= 310.0 + 1e-9);
        assert!(scale.position("missing").is_none());
    }
}
