//! Stamps each compile of the rice calculator with a build counter and UTC time.
//!
//! The counter lives in `build_number.txt` at the package root.

use std::fs;
use std::path::Path;

const COUNTER_FILE: &str = "build_number.txt";

/// Missing or garbled counter restarts at 0
fn previous_build(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(0)
}

fn main() {
    // Source edits bump the counter; plain rebuilds don't
    println!("cargo:rerun-if-changed=src");

    let counter = Path::new(COUNTER_FILE);
    let build = previous_build(counter) + 1;
    fs::write(counter, build.to_string()).expect("Failed to write build number file");

    let stamped_at = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");

    // Read back by build_info via option_env!
    println!("cargo:rustc-env=RICE_CALC_BUILD_NUMBER={}", build);
    println!("cargo:rustc-env=RICE_CALC_BUILD_TIMESTAMP={}", stamped_at);
    println!("cargo:warning=rice_calc build #{} at {}", build, stamped_at);
}
