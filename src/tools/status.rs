//! Rice Calc Status Tool
//!
//! Provides runtime status information and usage instructions.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Calculator usage instructions for AI assistants
pub const CALCULATOR_INSTRUCTIONS: &str = r#"
# Rice Cooker Calculator Instructions

Works out how much rice and water to put in a rice cooker.

## Overview

The calculator holds one form with three linked amounts:
1. **Uncooked rice** (g) - what goes into the cooker
2. **Cooked rice** (g) - what comes out, either typed in grams or built from portions
3. **Water** (ml) - derived from the uncooked amount and the texture preference

Whichever amount you set last drives the others.

---

## Entering Amounts

| Task | Tool |
|------|------|
| "I have 300 g of rice" | `set_uncooked(value: 300)` |
| "I want 600 g cooked" | `set_cooked(value: 600)` |
| "Enough for 3 people" | `set_portions(count: 3, size: "medium")` |
| Back to grams | `set_view_mode(mode: "mass")` |
| Softer / firmer rice | `set_texture(value: 0..100)` |
| Quick answer, no form change | `convert(...)` |
| Start over | `reset_calculator` |

Empty or non-numeric values clear a field; they never raise an error.

### Texture
- 0 = firm (10% less water)
- 50 = neutral (1.3 ml water per gram of rice)
- 100 = soft (10% more water)

Water is rounded to the nearest 10 ml.

---

## Calibration

Rice cookers differ. The **yield ratio** is cooked grams per uncooked gram
(default 1.96).

If a cook came out different from the prediction, weigh both and call:
```
calibrate_yield_ratio(observed_uncooked: 200, observed_cooked: 410)
```

Other settings:
- `set_yield_ratio(value: 2.1)`
- `set_portion_size(size: "large", grams: 280)` (defaults 150 / 200 / 250 g)
- `get_settings`

Calibration is saved and the form is recalculated from whichever amount was
entered last. Zero or negative values are ignored (`applied: false`).
"#;

/// Runtime status of the calculator service
#[derive(Debug, Clone, Serialize)]
pub struct RiceCalcStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> RiceCalcStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        RiceCalcStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/rice_calc.db"));
        let status = tracker.get_status();
        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }
}
