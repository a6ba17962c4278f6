//! Rice Cooker Calculator Library
//!
//! Conversions between uncooked rice, cooked rice, portions and water, with
//! persisted appliance calibration.

pub mod build_info;
pub mod conversion;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
