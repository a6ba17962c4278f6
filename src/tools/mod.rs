//! Rice Calc Tools module
//!
//! Tool implementations behind the MCP server.

pub mod calculator;
pub mod settings;
pub mod status;
