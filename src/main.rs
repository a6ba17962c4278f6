//! Rice Cooker Calculator
//!
//! An MCP server for working out rice and water amounts.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use rice_calc::build_info;
use rice_calc::db;
use rice_calc::mcp::RiceCalcService;
use rice_calc::models::CalibrationSettings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rice_calc=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let db_path = db::database_path();
    eprintln!("Database path: {}", db_path.display());

    let database = db::open(&db_path)?;

    // Load once at startup so a bad blob is reported early
    let settings = database.with_conn(CalibrationSettings::load)?;
    tracing::info!(
        "Calibration: yield ratio {:.3}, portions {}/{}/{} g",
        settings.yield_ratio,
        settings.portion_sizes.small,
        settings.portion_sizes.medium,
        settings.portion_sizes.large
    );

    let service = RiceCalcService::new(db_path, database);

    // Create stdio transport
    let transport = (stdin(), stdout());

    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
