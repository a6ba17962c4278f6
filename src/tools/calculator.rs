//! Calculator Tools
//!
//! Tools that edit the calculator form and the stateless one-shot conversion.

use serde::Serialize;

use super::settings::load_settings;
use crate::conversion::{BowlLevel, PortionSize, ViewMode};
use crate::db::Database;
use crate::models::{CalculatorState, CalculatorView, FieldUpdate};

/// The field a one-shot conversion starts from
///
/// A `None` amount is an entry that did not parse; it converts to nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConversionSource {
    Uncooked(Option<f64>),
    Cooked(Option<f64>),
    Portions { count: Option<u32>, size: PortionSize },
}

/// Response for convert
#[derive(Debug, Serialize)]
pub struct ConversionResponse {
    pub uncooked_g: Option<f64>,
    pub cooked_g: Option<f64>,
    pub water_ml: Option<f64>,
    pub texture: f64,
    pub yield_ratio: f64,
    pub bowl: BowlLevel,
}

/// Get the current calculator view
pub fn get_calculator(db: &Database, state: &CalculatorState) -> Result<CalculatorView, String> {
    let settings = load_settings(db)?;
    Ok(state.view(&settings))
}

/// Apply one field edit against the stored calibration
pub fn update_field(
    db: &Database,
    state: &mut CalculatorState,
    update: FieldUpdate,
) -> Result<CalculatorView, String> {
    let settings = load_settings(db)?;
    state.apply(update, &settings);
    tracing::debug!("Applied {:?}, driver now {:?}", update, state.driver());
    Ok(state.view(&settings))
}

/// Set portion count and/or size in one edit, switching to portion mode
pub fn set_portions(
    db: &Database,
    state: &mut CalculatorState,
    count: Option<u32>,
    size: Option<PortionSize>,
) -> Result<CalculatorView, String> {
    let settings = load_settings(db)?;
    state.apply(FieldUpdate::ViewMode(ViewMode::Portions), &settings);
    if let Some(size) = size {
        state.apply(FieldUpdate::PortionSize(size), &settings);
    }
    if let Some(count) = count {
        state.apply(FieldUpdate::PortionCount(Some(count)), &settings);
    }
    Ok(state.view(&settings))
}

/// Switch between mass and portion entry
pub fn set_view_mode(
    db: &Database,
    state: &mut CalculatorState,
    mode: ViewMode,
) -> Result<CalculatorView, String> {
    update_field(db, state, FieldUpdate::ViewMode(mode))
}

/// Clear the calculator
pub fn reset_calculator(db: &Database, state: &mut CalculatorState) -> Result<CalculatorView, String> {
    state.reset();
    get_calculator(db, state)
}

/// Convert from one field without touching the session calculator
pub fn convert(
    db: &Database,
    source: ConversionSource,
    texture: Option<f64>,
) -> Result<ConversionResponse, String> {
    let settings = load_settings(db)?;
    let mut scratch = CalculatorState::new();

    if let Some(texture) = texture {
        scratch.apply(FieldUpdate::Texture(texture), &settings);
    }
    match source {
        ConversionSource::Uncooked(grams) => {
            scratch.apply(FieldUpdate::Uncooked(grams), &settings);
        }
        ConversionSource::Cooked(grams) => {
            scratch.apply(FieldUpdate::Cooked(grams), &settings);
        }
        ConversionSource::Portions { count, size } => {
            scratch.apply(FieldUpdate::ViewMode(ViewMode::Portions), &settings);
            scratch.apply(FieldUpdate::PortionSize(size), &settings);
            scratch.apply(FieldUpdate::PortionCount(count), &settings);
        }
    }

    let view = scratch.view(&settings);
    Ok(ConversionResponse {
        uncooked_g: view.uncooked_g,
        cooked_g: view.cooked_g,
        water_ml: view.water_ml,
        texture: view.texture,
        yield_ratio: settings.yield_ratio,
        bowl: view.bowl,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DrivingField;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| crate::db::migrations::run_migrations(conn))
            .unwrap();
        db
    }

    #[test]
    fn test_update_field() {
        let db = test_db();
        let mut state = CalculatorState::new();
        let view = update_field(&db, &mut state, FieldUpdate::Uncooked(Some(150.0))).unwrap();
        assert!((view.cooked_g.unwrap() - 294.0).abs() < 0.001);
        assert_eq!(view.water_ml, Some(200.0));
        assert_eq!(view.driver, Some(DrivingField::Uncooked));
    }

    #[test]
    fn test_set_portions() {
        let db = test_db();
        let mut state = CalculatorState::new();
        let view = set_portions(&db, &mut state, Some(2), Some(PortionSize::Medium)).unwrap();
        assert_eq!(view.view_mode, ViewMode::Portions);
        assert_eq!(view.cooked_g, Some(400.0));
        assert_eq!(view.uncooked_g, Some(204.0));

        // size alone keeps the count
        let view = set_portions(&db, &mut state, None, Some(PortionSize::Small)).unwrap();
        assert_eq!(view.cooked_g, Some(300.0));
    }

    #[test]
    fn test_set_view_mode() {
        let db = test_db();
        let mut state = CalculatorState::new();
        set_portions(&db, &mut state, Some(2), None).unwrap();
        let view = set_view_mode(&db, &mut state, ViewMode::Mass).unwrap();
        assert_eq!(view.view_mode, ViewMode::Mass);
        assert_eq!(view.cooked_g, Some(400.0));
        assert_eq!(view.driver, Some(DrivingField::Cooked));
    }

    #[test]
    fn test_reset() {
        let db = test_db();
        let mut state = CalculatorState::new();
        update_field(&db, &mut state, FieldUpdate::Cooked(Some(500.0))).unwrap();
        let view = reset_calculator(&db, &mut state).unwrap();
        assert_eq!(view.cooked_g, None);
        assert_eq!(view.driver, None);
    }

    #[test]
    fn test_convert_from_cooked_and_portions() {
        let db = test_db();
        let response = convert(&db, ConversionSource::Cooked(Some(400.0)), None).unwrap();
        // 400 / 1.96 = 204.08 -> 204; 204 * 1.3 = 265.2 -> 270
        assert_eq!(response.uncooked_g, Some(204.0));
        assert_eq!(response.water_ml, Some(270.0));
        assert_eq!(response.yield_ratio, 1.96);

        let response = convert(
            &db,
            ConversionSource::Portions { count: Some(2), size: PortionSize::Medium },
            Some(100.0),
        )
        .unwrap();
        assert_eq!(response.cooked_g, Some(400.0));
        assert_eq!(response.uncooked_g, Some(204.0));
        // 204 * 1.43 = 291.72 -> 292 -> 290
        assert_eq!(response.water_ml, Some(290.0));
        assert_eq!(response.texture, 100.0);
    }

    #[test]
    fn test_convert_invalid_is_unset() {
        let db = test_db();
        let response = convert(&db, ConversionSource::Uncooked(Some(-3.0)), None).unwrap();
        assert_eq!(response.uncooked_g, None);
        assert_eq!(response.cooked_g, None);
        assert_eq!(response.water_ml, None);
        assert_eq!(response.bowl, BowlLevel::Empty);

        let response = convert(
            &db,
            ConversionSource::Portions { count: None, size: PortionSize::Large },
            None,
        )
        .unwrap();
        assert_eq!(response.cooked_g, None);
        assert_eq!(response.water_ml, None);
    }
}
