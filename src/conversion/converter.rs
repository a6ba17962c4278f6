//! Rice and water conversion functions
//!
//! Every conversion is pure. Inputs that are missing, non-finite, zero or
//! negative produce `None` instead of a NaN or a panic.

use super::units::{
    clamp_texture, BASE_WATER_RATIO, NEUTRAL_TEXTURE, TEXTURE_ADJUSTMENT_DIVISOR,
    WATER_ROUNDING_ML,
};

/// Keep only finite, strictly positive values
fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Parse a free-form quantity like "150", " 2.5 " or "1e2"
///
/// Empty and non-numeric text is unset. Sign is preserved so callers can
/// decide how to treat negative entries.
pub fn parse_quantity(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a portion count, truncating any fractional part
///
/// Examples:
/// - "3" -> Some(3)
/// - "2.7" -> Some(2)
/// - "-1" / "abc" / "" -> None
pub fn parse_portion_count(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    if let Ok(count) = trimmed.parse::<u32>() {
        return Some(count);
    }

    let value = parse_quantity(trimmed)?;
    if value < 0.0 || value > u32::MAX as f64 {
        return None;
    }
    Some(value.trunc() as u32)
}

/// Cooked mass produced by the given uncooked mass
pub fn cooked_from_uncooked(uncooked: f64, yield_ratio: f64) -> Option<f64> {
    let uncooked = positive(uncooked)?;
    let yield_ratio = positive(yield_ratio)?;
    Some(uncooked * yield_ratio)
}

/// Uncooked mass needed for the given cooked mass, rounded to whole grams
pub fn uncooked_from_cooked(cooked: f64, yield_ratio: f64) -> Option<f64> {
    let cooked = positive(cooked)?;
    let yield_ratio = positive(yield_ratio)?;
    Some((cooked / yield_ratio).round())
}

/// Cooked mass for a number of portions of a given size
pub fn cooked_from_portions(portion_count: u32, portion_grams: f64) -> Option<f64> {
    if portion_count == 0 {
        return None;
    }
    let portion_grams = positive(portion_grams)?;
    Some(portion_count as f64 * portion_grams)
}

/// Cooked and uncooked mass for a number of portions
///
/// Returns `(cooked, uncooked)`.
pub fn masses_from_portions(
    portion_count: u32,
    portion_grams: f64,
    yield_ratio: f64,
) -> Option<(f64, f64)> {
    let cooked = cooked_from_portions(portion_count, portion_grams)?;
    let uncooked = uncooked_from_cooked(cooked, yield_ratio)?;
    Some((cooked, uncooked))
}

/// Water-to-rice ratio for a texture preference
///
/// Neutral (50) gives the base ratio; firm (0) and soft (100) move it by 10%.
pub fn water_ratio(texture: f64) -> f64 {
    let adjustment = (clamp_texture(texture) - NEUTRAL_TEXTURE) / TEXTURE_ADJUSTMENT_DIVISOR;
    BASE_WATER_RATIO * (1.0 + adjustment)
}

/// Water to add for an uncooked mass, in milliliters rounded to the nearest 10
pub fn water_volume(uncooked: f64, texture: f64) -> Option<f64> {
    let uncooked = positive(uncooked)?;
    let exact_ml = (uncooked * water_ratio(texture)).round();
    Some((exact_ml / WATER_ROUNDING_ML).round() * WATER_ROUNDING_ML)
}

/// Yield ratio observed from a real cook
///
/// Only computed when both masses are positive numbers.
pub fn calibrate_yield_ratio(observed_uncooked: f64, observed_cooked: f64) -> Option<f64> {
    let observed_uncooked = positive(observed_uncooked)?;
    let observed_cooked = positive(observed_cooked)?;
    Some(observed_cooked / observed_uncooked)
}
