//! Utility to show or set the stored calibration
//!
//! Usage:
//!   set_calibration                          show current settings
//!   set_calibration yield <ratio>            set the yield ratio
//!   set_calibration portion <size> <grams>   set a portion size
//!   set_calibration observe <uncooked> <cooked>
//!   set_calibration reset                    restore defaults

use rice_calc::conversion::{parse_quantity, PortionSize};
use rice_calc::db;
use rice_calc::models::CalibrationSettings;

fn print_settings(settings: &CalibrationSettings) {
    println!("  Yield ratio: {:.3}", settings.yield_ratio);
    for size in PortionSize::ALL {
        println!("  {:<7} {} g", format!("{}:", size.as_str()), settings.portion_grams(size));
    }
}

fn arg_quantity(args: &[String], index: usize) -> Option<f64> {
    args.get(index).and_then(|s| parse_quantity(s))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    let db_path = db::database_path();
    println!("Database path: {}", db_path.display());
    let database = db::open(&db_path)?;

    database.with_conn(|conn| {
        let mut settings = CalibrationSettings::load(conn)?;

        let applied = match args.get(1).map(|s| s.as_str()) {
            None => {
                println!("Current calibration:");
                print_settings(&settings);
                return Ok(());
            }
            Some("yield") => arg_quantity(&args, 2).is_some_and(|r| settings.set_yield_ratio(r)),
            Some("portion") => {
                match args.get(2).and_then(|s| PortionSize::from_str(s)) {
                    Some(size) => arg_quantity(&args, 3).is_some_and(|g| settings.set_portion_size(size, g)),
                    None => false,
                }
            }
            Some("observe") => match (arg_quantity(&args, 2), arg_quantity(&args, 3)) {
                (Some(uncooked), Some(cooked)) => settings.calibrate(uncooked, cooked),
                _ => false,
            },
            Some("reset") => {
                settings = CalibrationSettings::default();
                true
            }
            Some(other) => {
                println!("Unknown command: {}", other);
                false
            }
        };

        if applied {
            settings.save(conn)?;
            println!("Calibration saved:");
        } else {
            println!("Nothing changed:");
        }
        print_settings(&settings);
        Ok(())
    })?;

    Ok(())
}
