//! Calculator state model
//!
//! The transient form state. Each edit arrives as a [`FieldUpdate`] and the
//! dependent fields are recomputed from it immediately.

use serde::{Deserialize, Serialize};

use super::CalibrationSettings;
use crate::conversion::units::NEUTRAL_TEXTURE;
use crate::conversion::{
    clamp_texture, cooked_from_uncooked, masses_from_portions, uncooked_from_cooked,
    water_volume, BowlLevel, PortionSize, ViewMode,
};

/// The field whose last edit determines the derived values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrivingField {
    Uncooked,
    Cooked,
    Portions,
}

/// A single user edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldUpdate {
    Uncooked(Option<f64>),
    Cooked(Option<f64>),
    PortionCount(Option<u32>),
    PortionSize(PortionSize),
    Texture(f64),
    ViewMode(ViewMode),
}

/// Per-session calculator state
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    pub uncooked: Option<f64>,
    pub cooked: Option<f64>,
    /// 0 = firm, 100 = soft
    pub texture: f64,
    pub view_mode: ViewMode,
    pub portion_count: Option<u32>,
    pub portion_size: PortionSize,
    driver: Option<DrivingField>,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            uncooked: None,
            cooked: None,
            texture: NEUTRAL_TEXTURE,
            view_mode: ViewMode::default(),
            portion_count: None,
            portion_size: PortionSize::default(),
            driver: None,
        }
    }
}

/// Masses are non-negative; anything else is shown as empty
fn sanitize_mass(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

impl CalculatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn driver(&self) -> Option<DrivingField> {
        self.driver
    }

    /// Apply one edit and recompute the fields that depend on it
    pub fn apply(&mut self, update: FieldUpdate, settings: &CalibrationSettings) {
        match update {
            FieldUpdate::Uncooked(value) => {
                self.uncooked = sanitize_mass(value);
                self.driver = Some(DrivingField::Uncooked);
                self.derive_from_uncooked(settings);
            }
            FieldUpdate::Cooked(value) => {
                self.cooked = sanitize_mass(value);
                self.driver = Some(DrivingField::Cooked);
                self.derive_from_cooked(settings);
            }
            FieldUpdate::PortionCount(count) => {
                self.portion_count = count;
                self.derive_from_portions(settings);
            }
            FieldUpdate::PortionSize(size) => {
                self.portion_size = size;
                self.derive_from_portions(settings);
            }
            FieldUpdate::ViewMode(mode) => {
                self.view_mode = mode;
                // Leaving portion mode leaves the cooked grams as the visible driver
                if mode == ViewMode::Mass && self.driver == Some(DrivingField::Portions) {
                    self.driver = Some(DrivingField::Cooked);
                }
                self.derive_from_portions(settings);
            }
            FieldUpdate::Texture(texture) => {
                self.texture = clamp_texture(texture);
            }
        }
    }

    /// Re-derive dependent fields after the calibration changed
    pub fn refresh(&mut self, settings: &CalibrationSettings) {
        match self.driver {
            Some(DrivingField::Uncooked) => self.derive_from_uncooked(settings),
            Some(DrivingField::Cooked) => self.derive_from_cooked(settings),
            Some(DrivingField::Portions) => self.derive_from_portions(settings),
            None => {}
        }
    }

    /// Clear every field back to the initial state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn derive_from_uncooked(&mut self, settings: &CalibrationSettings) {
        self.cooked = self
            .uncooked
            .and_then(|u| cooked_from_uncooked(u, settings.yield_ratio));
    }

    fn derive_from_cooked(&mut self, settings: &CalibrationSettings) {
        self.uncooked = self
            .cooked
            .and_then(|c| uncooked_from_cooked(c, settings.yield_ratio));
    }

    /// Portions only drive the masses in portion mode with a count entered
    fn derive_from_portions(&mut self, settings: &CalibrationSettings) {
        if self.view_mode != ViewMode::Portions {
            return;
        }
        let Some(count) = self.portion_count else {
            return;
        };

        let grams = settings.portion_grams(self.portion_size);
        match masses_from_portions(count, grams, settings.yield_ratio) {
            Some((cooked, uncooked)) => {
                self.cooked = Some(cooked);
                self.uncooked = Some(uncooked);
            }
            None => {
                self.cooked = None;
                self.uncooked = None;
            }
        }
        self.driver = Some(DrivingField::Portions);
    }

    /// Water to add for the current uncooked mass and texture
    pub fn water_ml(&self) -> Option<f64> {
        self.uncooked.and_then(|u| water_volume(u, self.texture))
    }

    /// Snapshot of the state with every derived value
    pub fn view(&self, settings: &CalibrationSettings) -> CalculatorView {
        CalculatorView {
            uncooked_g: self.uncooked,
            cooked_g: self.cooked,
            water_ml: self.water_ml(),
            texture: self.texture,
            view_mode: self.view_mode,
            portion_count: self.portion_count,
            portion_size: self.portion_size,
            portion_grams: settings.portion_grams(self.portion_size),
            bowl: BowlLevel::for_cooked(self.cooked),
            driver: self.driver,
        }
    }
}

/// Serializable snapshot of the calculator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatorView {
    pub uncooked_g: Option<f64>,
    pub cooked_g: Option<f64>,
    pub water_ml: Option<f64>,
    pub texture: f64,
    pub view_mode: ViewMode,
    pub portion_count: Option<u32>,
    pub portion_size: PortionSize,
    pub portion_grams: f64,
    pub bowl: BowlLevel,
    pub driver: Option<DrivingField>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_ratio(ratio: f64) -> CalibrationSettings {
        let mut settings = CalibrationSettings::default();
        assert!(settings.set_yield_ratio(ratio));
        settings
    }

    #[test]
    fn test_uncooked_drives_cooked_and_water() {
        let settings = CalibrationSettings::default();
        let mut state = CalculatorState::new();
        state.apply(FieldUpdate::Uncooked(Some(100.0)), &settings);

        assert!((state.cooked.unwrap() - 196.0).abs() < 0.001);
        assert_eq!(state.driver(), Some(DrivingField::Uncooked));
        // 100 * 1.3 = 130
        assert_eq!(state.water_ml(), Some(130.0));
    }

    #[test]
    fn test_cooked_drives_uncooked() {
        let settings = settings_with_ratio(2.0);
        let mut state = CalculatorState::new();
        state.apply(FieldUpdate::Cooked(Some(400.0)), &settings);

        assert_eq!(state.uncooked, Some(200.0));
        assert_eq!(state.driver(), Some(DrivingField::Cooked));
    }

    #[test]
    fn test_portions_drive_both_masses() {
        let settings = CalibrationSettings::default();
        let mut state = CalculatorState::new();
        state.apply(FieldUpdate::ViewMode(ViewMode::Portions), &settings);
        assert_eq!(state.driver(), None);

        state.apply(FieldUpdate::PortionCount(Some(2)), &settings);
        assert_eq!(state.cooked, Some(400.0));
        assert_eq!(state.uncooked, Some(204.0));
        assert_eq!(state.driver(), Some(DrivingField::Portions));

        state.apply(FieldUpdate::PortionSize(PortionSize::Large), &settings);
        assert_eq!(state.cooked, Some(500.0));
        // 500 / 1.96 = 255.1 -> 255
        assert_eq!(state.uncooked, Some(255.0));
    }

    #[test]
    fn test_portions_ignored_in_mass_mode() {
        let settings = CalibrationSettings::default();
        let mut state = CalculatorState::new();
        state.apply(FieldUpdate::Uncooked(Some(100.0)), &settings);
        state.apply(FieldUpdate::PortionCount(Some(3)), &settings);

        assert_eq!(state.uncooked, Some(100.0));
        assert_eq!(state.driver(), Some(DrivingField::Uncooked));

        // switching to portion mode picks up the stored count
        state.apply(FieldUpdate::ViewMode(ViewMode::Portions), &settings);
        assert_eq!(state.cooked, Some(600.0));
        assert_eq!(state.driver(), Some(DrivingField::Portions));
    }

    #[test]
    fn test_zero_portions_clear_masses() {
        let settings = CalibrationSettings::default();
        let mut state = CalculatorState::new();
        state.apply(FieldUpdate::ViewMode(ViewMode::Portions), &settings);
        state.apply(FieldUpdate::PortionCount(Some(2)), &settings);
        state.apply(FieldUpdate::PortionCount(Some(0)), &settings);

        assert_eq!(state.cooked, None);
        assert_eq!(state.uncooked, None);
        assert_eq!(state.water_ml(), None);
    }

    #[test]
    fn test_invalid_mass_is_unset() {
        let settings = CalibrationSettings::default();
        let mut state = CalculatorState::new();
        state.apply(FieldUpdate::Uncooked(Some(-50.0)), &settings);
        assert_eq!(state.uncooked, None);
        assert_eq!(state.cooked, None);

        state.apply(FieldUpdate::Cooked(Some(0.0)), &settings);
        assert_eq!(state.cooked, Some(0.0));
        assert_eq!(state.uncooked, None);
        assert_eq!(state.water_ml(), None);

        state.apply(FieldUpdate::Cooked(None), &settings);
        assert_eq!(state.cooked, None);
    }

    #[test]
    fn test_texture_changes_water_only() {
        let settings = CalibrationSettings::default();
        let mut state = CalculatorState::new();
        state.apply(FieldUpdate::Uncooked(Some(300.0)), &settings);
        let cooked = state.cooked;

        state.apply(FieldUpdate::Texture(100.0), &settings);
        assert_eq!(state.water_ml(), Some(430.0));
        state.apply(FieldUpdate::Texture(0.0), &settings);
        assert_eq!(state.water_ml(), Some(350.0));
        state.apply(FieldUpdate::Texture(140.0), &settings);
        assert_eq!(state.texture, 100.0);

        assert_eq!(state.cooked, cooked);
    }

    #[test]
    fn test_refresh_follows_driver() {
        let mut settings = CalibrationSettings::default();
        let mut state = CalculatorState::new();
        state.apply(FieldUpdate::Cooked(Some(400.0)), &settings);
        assert_eq!(state.uncooked, Some(204.0));

        assert!(settings.calibrate(200.0, 400.0));
        state.refresh(&settings);
        assert_eq!(state.cooked, Some(400.0));
        assert_eq!(state.uncooked, Some(200.0));

        state.apply(FieldUpdate::Uncooked(Some(150.0)), &settings);
        assert!(settings.set_yield_ratio(3.0));
        state.refresh(&settings);
        assert_eq!(state.uncooked, Some(150.0));
        assert!((state.cooked.unwrap() - 450.0).abs() < 0.001);
    }

    #[test]
    fn test_refresh_portions_after_size_change() {
        let mut settings = CalibrationSettings::default();
        let mut state = CalculatorState::new();
        state.apply(FieldUpdate::ViewMode(ViewMode::Portions), &settings);
        state.apply(FieldUpdate::PortionCount(Some(2)), &settings);

        assert!(settings.set_portion_size(PortionSize::Medium, 220.0));
        state.refresh(&settings);
        assert_eq!(state.cooked, Some(440.0));
    }

    #[test]
    fn test_refresh_after_leaving_portion_mode() {
        let mut settings = CalibrationSettings::default();
        let mut state = CalculatorState::new();
        state.apply(FieldUpdate::ViewMode(ViewMode::Portions), &settings);
        state.apply(FieldUpdate::PortionCount(Some(2)), &settings);
        state.apply(FieldUpdate::ViewMode(ViewMode::Mass), &settings);

        assert_eq!(state.driver(), Some(DrivingField::Cooked));
        assert_eq!(state.cooked, Some(400.0));
        assert_eq!(state.uncooked, Some(204.0));

        assert!(settings.set_yield_ratio(2.0));
        state.refresh(&settings);
        assert_eq!(state.cooked, Some(400.0));
        assert_eq!(state.uncooked, Some(200.0));
    }

    #[test]
    fn test_refresh_without_driver_is_noop() {
        let settings = settings_with_ratio(2.5);
        let mut state = CalculatorState::new();
        state.refresh(&settings);
        assert_eq!(state, CalculatorState::default());
    }

    #[test]
    fn test_view_and_reset() {
        let settings = CalibrationSettings::default();
        let mut state = CalculatorState::new();
        state.apply(FieldUpdate::Uncooked(Some(150.0)), &settings);

        let view = state.view(&settings);
        assert_eq!(view.water_ml, Some(200.0));
        assert_eq!(view.portion_grams, 200.0);
        // 150 * 1.96 = 294
        assert_eq!(view.bowl, BowlLevel::Low);

        state.reset();
        assert_eq!(state, CalculatorState::default());
        assert_eq!(state.view(&settings).bowl, BowlLevel::Empty);
    }
}
