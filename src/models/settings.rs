//! Calibration settings model
//!
//! The yield ratio and portion-size table, persisted as a single JSON blob.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::conversion::units::{
    DEFAULT_LARGE_PORTION_G, DEFAULT_MEDIUM_PORTION_G, DEFAULT_SMALL_PORTION_G,
    DEFAULT_YIELD_RATIO,
};
use crate::conversion::{calibrate_yield_ratio, PortionSize};
use crate::db::DbResult;

/// Key the settings blob is stored under
pub const SETTINGS_KEY: &str = "riceSettings";

fn default_yield_ratio() -> f64 {
    DEFAULT_YIELD_RATIO
}
fn default_small() -> f64 {
    DEFAULT_SMALL_PORTION_G
}
fn default_medium() -> f64 {
    DEFAULT_MEDIUM_PORTION_G
}
fn default_large() -> f64 {
    DEFAULT_LARGE_PORTION_G
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Grams of cooked rice per portion, by size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortionSizes {
    #[serde(default = "default_small")]
    pub small: f64,
    #[serde(default = "default_medium")]
    pub medium: f64,
    #[serde(default = "default_large")]
    pub large: f64,
}

impl Default for PortionSizes {
    fn default() -> Self {
        Self {
            small: DEFAULT_SMALL_PORTION_G,
            medium: DEFAULT_MEDIUM_PORTION_G,
            large: DEFAULT_LARGE_PORTION_G,
        }
    }
}

impl PortionSizes {
    pub fn get(&self, size: PortionSize) -> f64 {
        match size {
            PortionSize::Small => self.small,
            PortionSize::Medium => self.medium,
            PortionSize::Large => self.large,
        }
    }

    fn slot_mut(&mut self, size: PortionSize) -> &mut f64 {
        match size {
            PortionSize::Small => &mut self.small,
            PortionSize::Medium => &mut self.medium,
            PortionSize::Large => &mut self.large,
        }
    }
}

/// User calibration for their appliance and serving habits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationSettings {
    /// Cooked mass divided by uncooked mass
    #[serde(default = "default_yield_ratio")]
    pub yield_ratio: f64,
    #[serde(default)]
    pub portion_sizes: PortionSizes,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            yield_ratio: DEFAULT_YIELD_RATIO,
            portion_sizes: PortionSizes::default(),
        }
    }
}

impl CalibrationSettings {
    /// Whether the ratio and every portion size are positive
    pub fn is_valid(&self) -> bool {
        is_positive(self.yield_ratio)
            && PortionSize::ALL
                .iter()
                .all(|&size| is_positive(self.portion_sizes.get(size)))
    }

    /// Grams per portion for a size
    pub fn portion_grams(&self, size: PortionSize) -> f64 {
        self.portion_sizes.get(size)
    }

    /// Set the yield ratio, ignoring non-positive values
    ///
    /// Returns whether the value was applied.
    pub fn set_yield_ratio(&mut self, yield_ratio: f64) -> bool {
        if !is_positive(yield_ratio) {
            return false;
        }
        self.yield_ratio = yield_ratio;
        true
    }

    /// Set the grams for one portion size, ignoring non-positive values
    pub fn set_portion_size(&mut self, size: PortionSize, grams: f64) -> bool {
        if !is_positive(grams) {
            return false;
        }
        *self.portion_sizes.slot_mut(size) = grams;
        true
    }

    /// Derive the yield ratio from an observed cook
    ///
    /// Leaves the ratio unchanged unless both masses are positive.
    pub fn calibrate(&mut self, observed_uncooked: f64, observed_cooked: f64) -> bool {
        match calibrate_yield_ratio(observed_uncooked, observed_cooked) {
            Some(ratio) => {
                self.yield_ratio = ratio;
                true
            }
            None => false,
        }
    }

    /// Parse a stored blob, falling back to defaults when it is unusable
    pub fn from_json(blob: &str) -> Self {
        match serde_json::from_str::<Self>(blob) {
            Ok(settings) if settings.is_valid() => settings,
            Ok(settings) => {
                tracing::warn!(
                    "Stored settings out of range ({:?}), using defaults",
                    settings
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Stored settings unreadable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load the settings (absent or corrupt blob yields defaults)
    pub fn load(conn: &Connection) -> DbResult<Self> {
        let blob: Option<String> = conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![SETTINGS_KEY],
                |row| row.get(0),
            )
            .optional()?;

        Ok(match blob {
            Some(blob) => Self::from_json(&blob),
            None => Self::default(),
        })
    }

    /// Save the settings (upsert)
    pub fn save(&self, conn: &Connection) -> DbResult<()> {
        let blob = serde_json::to_string(self)?;
        let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();

        conn.execute(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![SETTINGS_KEY, blob, now],
        )?;
        tracing::debug!("Saved calibration settings: {}", blob);
        Ok(())
    }

    /// When the settings were last saved, if ever
    pub fn updated_at(conn: &Connection) -> DbResult<Option<String>> {
        Ok(conn
            .query_row(
                "SELECT updated_at FROM settings WHERE key = ?1",
                params![SETTINGS_KEY],
                |row| row.get(0),
            )
            .optional()?)
    }
}
