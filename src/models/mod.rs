//! Data models
//!
//! Calibration settings and calculator state.

mod calculator;
mod settings;

pub use calculator::{CalculatorState, CalculatorView, DrivingField, FieldUpdate};
pub use settings::{CalibrationSettings, PortionSizes, SETTINGS_KEY};
