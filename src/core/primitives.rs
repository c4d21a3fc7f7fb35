use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{StoryError, StoryResult};

/// Placeholder shown wherever a stat is missing.
pub const MISSING_VALUE_LABEL: &str = "N/A";

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> StoryResult<f64> {
    value.to_f64().ok_or_else(|| {
        StoryError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Parses a CSV cell as a decimal number.
///
/// Empty or non-numeric cells are `None`, never zero. Bare fractions such as
/// `.401` and scientific notation are accepted.
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = if let Some(rest) = trimmed.strip_prefix("-.") {
        format!("-0.{rest}")
    } else if let Some(rest) = trimmed.strip_prefix('.') {
        format!("0.{rest}")
    } else {
        trimmed.to_owned()
    };

    let value = Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()?;
    decimal_to_f64(value, "cell").ok()
}

/// Formats with a fixed number of decimals, rounding half away from zero.
#[must_use]
pub fn format_fixed(value: f64, decimals: u32) -> String {
    let Some(decimal) = Decimal::from_f64(value) else {
        return MISSING_VALUE_LABEL.to_owned();
    };
    let rounded = decimal.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", decimals as usize, rounded)
}

/// Formats a `[0, 1]` fraction as a percentage, e.g. `0.3551 -> "35.5%"`.
#[must_use]
pub fn format_percent(fraction: f64, decimals: u32) -> String {
    let Some(decimal) = Decimal::from_f64(fraction) else {
        return MISSING_VALUE_LABEL.to_owned();
    };
    let scaled = (decimal * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", decimals as usize, scaled)
}

#[must_use]
pub fn format_optional_fixed(value: Option<f64>, decimals: u32) -> String {
    value.map_or_else(|| MISSING_VALUE_LABEL.to_owned(), |v| format_fixed(v, decimals))
}

#[must_use]
pub fn format_optional_percent(value: Option<f64>, decimals: u32) -> String {
    value.map_or_else(
        || MISSING_VALUE_LABEL.to_owned(),
        |v| format_percent(v, decimals),
    )
}

#[cfg(test)]
mod tests {
    use super::{format_fixed, format_optional_percent, format_percent, parse_decimal};

    #[test]
    fn parse_decimal_rejects_blank_and_text() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("24.1"), Some(24.1));
        assert_eq!(parse_decimal(".401"), Some(0.401));
        assert_eq!(parse_decimal("-.5"), Some(-0.5));
    }

    #[test]
    fn fixed_and_percent_formatting() {
        assert_eq!(format_fixed(24.06, 1), "24.1");
        assert_eq!(format_fixed(3.0, 1), "3.0");
        assert_eq!(format_percent(0.3551, 1), "35.5%");
        assert_eq!(format_percent(0.35, 0), "35%");
        assert_eq!(format_optional_percent(None, 1), "N/A");
    }
}
