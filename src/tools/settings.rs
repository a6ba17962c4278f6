//! Calibration Settings Tools
//!
//! Tools behind the calibration panel. Every accepted change is saved and the
//! calculator re-derived against the new calibration.

use serde::Serialize;

use crate::conversion::PortionSize;
use crate::db::Database;
use crate::models::{CalculatorState, CalculatorView, CalibrationSettings};

/// Response for get_settings
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub settings: CalibrationSettings,
    /// None until the settings are first saved
    pub updated_at: Option<String>,
}

/// Response for any calibration edit
#[derive(Debug, Serialize)]
pub struct SettingsChangeResponse {
    /// False when the value was rejected and nothing changed
    pub applied: bool,
    pub settings: CalibrationSettings,
    pub calculator: CalculatorView,
}

/// Load the current calibration settings
pub fn load_settings(db: &Database) -> Result<CalibrationSettings, String> {
    db.with_conn(CalibrationSettings::load)
        .map_err(|e| format!("Failed to load settings: {}", e))
}

/// Get the calibration settings and when they were last saved
pub fn get_settings(db: &Database) -> Result<SettingsResponse, String> {
    db.with_conn(|conn| {
        Ok(SettingsResponse {
            settings: CalibrationSettings::load(conn)?,
            updated_at: CalibrationSettings::updated_at(conn)?,
        })
    })
    .map_err(|e| format!("Database error: {}", e))
}

/// Read, modify and (if accepted) write the settings in one step
fn edit_settings<F>(
    db: &Database,
    state: &mut CalculatorState,
    edit: F,
) -> Result<SettingsChangeResponse, String>
where
    F: FnOnce(&mut CalibrationSettings) -> bool,
{
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let mut settings = CalibrationSettings::load(&conn)
        .map_err(|e| format!("Failed to load settings: {}", e))?;

    let applied = edit(&mut settings);
    if applied {
        settings
            .save(&conn)
            .map_err(|e| format!("Failed to save settings: {}", e))?;
        state.refresh(&settings);
        tracing::info!(
            "Calibration updated: yield ratio {:.3}, portions {}/{}/{} g",
            settings.yield_ratio,
            settings.portion_sizes.small,
            settings.portion_sizes.medium,
            settings.portion_sizes.large
        );
    } else {
        tracing::debug!("Calibration edit rejected, settings unchanged");
    }

    Ok(SettingsChangeResponse {
        applied,
        settings,
        calculator: state.view(&settings),
    })
}

/// Set the yield ratio directly
pub fn set_yield_ratio(
    db: &Database,
    state: &mut CalculatorState,
    yield_ratio: Option<f64>,
) -> Result<SettingsChangeResponse, String> {
    edit_settings(db, state, |settings| {
        yield_ratio.is_some_and(|ratio| settings.set_yield_ratio(ratio))
    })
}

/// Set the grams of one portion size
pub fn set_portion_size(
    db: &Database,
    state: &mut CalculatorState,
    size: PortionSize,
    grams: Option<f64>,
) -> Result<SettingsChangeResponse, String> {
    edit_settings(db, state, |settings| {
        grams.is_some_and(|grams| settings.set_portion_size(size, grams))
    })
}

/// Derive the yield ratio from an observed cook
pub fn calibrate_yield_ratio(
    db: &Database,
    state: &mut CalculatorState,
    observed_uncooked: Option<f64>,
    observed_cooked: Option<f64>,
) -> Result<SettingsChangeResponse, String> {
    edit_settings(db, state, |settings| match (observed_uncooked, observed_cooked) {
        (Some(uncooked), Some(cooked)) => settings.calibrate(uncooked, cooked),
        _ => false,
    })
}
