//! Calibration types and conversion constants
//!
//! Provides the portion-size categories and the fixed factors used by the
//! rice and water conversions.

use serde::{Deserialize, Serialize};

/// Portion size category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PortionSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl PortionSize {
    /// All sizes, smallest first
    pub const ALL: [PortionSize; 3] = [PortionSize::Small, PortionSize::Medium, PortionSize::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            PortionSize::Small => "small",
            PortionSize::Medium => "medium",
            PortionSize::Large => "large",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "small" | "s" => Some(PortionSize::Small),
            "medium" | "m" => Some(PortionSize::Medium),
            "large" | "l" => Some(PortionSize::Large),
            _ => None,
        }
    }
}

/// How the cooked side of the calculator is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Cooked mass typed directly in grams
    #[default]
    Mass,
    /// Cooked mass derived from a portion count and size
    Portions,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Mass => "mass",
            ViewMode::Portions => "portions",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mass" | "grams" | "g" => Some(ViewMode::Mass),
            "portions" | "portion" => Some(ViewMode::Portions),
            _ => None,
        }
    }
}

/// Fill level of the serving bowl for a cooked amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BowlLevel {
    Empty,
    Low,
    Medium,
    High,
    /// More than one bowl holds
    Overflowing,
}

impl BowlLevel {
    /// Classify a cooked mass in grams
    pub fn for_cooked(cooked: Option<f64>) -> Self {
        match cooked {
            Some(g) if g >= BOWL_HIGH_MAX_G => BowlLevel::Overflowing,
            Some(g) if g >= BOWL_MEDIUM_MAX_G => BowlLevel::High,
            Some(g) if g >= BOWL_LOW_MAX_G => BowlLevel::Medium,
            Some(g) if g >= BOWL_EMPTY_MAX_G => BowlLevel::Low,
            _ => BowlLevel::Empty,
        }
    }
}

// ============================================================================
// Calibration Defaults
// ============================================================================

/// Cooked grams per uncooked gram for a typical rice cooker
pub const DEFAULT_YIELD_RATIO: f64 = 1.96;
/// Grams of cooked rice in a small portion
pub const DEFAULT_SMALL_PORTION_G: f64 = 150.0;
/// Grams of cooked rice in a medium portion
pub const DEFAULT_MEDIUM_PORTION_G: f64 = 200.0;
/// Grams of cooked rice in a large portion
pub const DEFAULT_LARGE_PORTION_G: f64 = 250.0;

// ============================================================================
// Water Constants
// ============================================================================

/// Milliliters of water per gram of uncooked rice at neutral texture
pub const BASE_WATER_RATIO: f64 = 1.3;
/// Texture preference that applies no adjustment
pub const NEUTRAL_TEXTURE: f64 = 50.0;
/// Firmest texture preference
pub const MIN_TEXTURE: f64 = 0.0;
/// Softest texture preference
pub const MAX_TEXTURE: f64 = 100.0;
/// Divisor mapping the texture offset onto a ratio adjustment (±50 → ±10%)
pub const TEXTURE_ADJUSTMENT_DIVISOR: f64 = 500.0;
/// Water volumes are reported to the nearest multiple of this
pub const WATER_ROUNDING_ML: f64 = 10.0;

// ============================================================================
// Bowl Thresholds (grams of cooked rice)
// ============================================================================

const BOWL_EMPTY_MAX_G: f64 = 100.0;
const BOWL_LOW_MAX_G: f64 = 450.0;
const BOWL_MEDIUM_MAX_G: f64 = 1000.0;
const BOWL_HIGH_MAX_G: f64 = 1600.0;

/// Clamp a texture preference into the firm..soft range
pub fn clamp_texture(texture: f64) -> f64 {
    if texture.is_nan() {
        return NEUTRAL_TEXTURE;
    }
    texture.clamp(MIN_TEXTURE, MAX_TEXTURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portion_size_from_str() {
        assert_eq!(PortionSize::from_str("small"), Some(PortionSize::Small));
        assert_eq!(PortionSize::from_str(" Medium "), Some(PortionSize::Medium));
        assert_eq!(PortionSize::from_str("L"), Some(PortionSize::Large));
        assert_eq!(PortionSize::from_str("huge"), None);
    }

    #[test]
    fn test_view_mode_from_str() {
        assert_eq!(ViewMode::from_str("grams"), Some(ViewMode::Mass));
        assert_eq!(ViewMode::from_str("portions"), Some(ViewMode::Portions));
        assert_eq!(ViewMode::from_str("cups"), None);
    }

    #[test]
    fn test_bowl_levels() {
        assert_eq!(BowlLevel::for_cooked(None), BowlLevel::Empty);
        assert_eq!(BowlLevel::for_cooked(Some(99.0)), BowlLevel::Empty);
        assert_eq!(BowlLevel::for_cooked(Some(100.0)), BowlLevel::Low);
        assert_eq!(BowlLevel::for_cooked(Some(449.9)), BowlLevel::Low);
        assert_eq!(BowlLevel::for_cooked(Some(450.0)), BowlLevel::Medium);
        assert_eq!(BowlLevel::for_cooked(Some(1200.0)), BowlLevel::High);
        assert_eq!(BowlLevel::for_cooked(Some(1600.0)), BowlLevel::Overflowing);
    }

    #[test]
    fn test_clamp_texture() {
        assert_eq!(clamp_texture(-20.0), MIN_TEXTURE);
        assert_eq!(clamp_texture(150.0), MAX_TEXTURE);
        assert_eq!(clamp_texture(75.0), 75.0);
        assert_eq!(clamp_texture(f64::NAN), NEUTRAL_TEXTURE);
    }
}
