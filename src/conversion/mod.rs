//! Rice conversion module
//!
//! Handles conversions between uncooked rice, cooked rice, portions and water.

pub mod converter;
pub mod units;

pub use converter::{
    calibrate_yield_ratio, cooked_from_portions, cooked_from_uncooked, masses_from_portions,
    parse_portion_count, parse_quantity, uncooked_from_cooked, water_ratio, water_volume,
};
pub use units::{clamp_texture, BowlLevel, PortionSize, ViewMode};
