//! Rice Calc MCP Server Implementation
//!
//! Implements the MCP server with all calculator tools.

use std::path::PathBuf;
use std::sync::{Arc, MutexGuard};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::conversion::{parse_portion_count, parse_quantity, PortionSize, ViewMode};
use crate::db::Database;
use crate::models::{CalculatorState, FieldUpdate};
use crate::tools::calculator::{self, ConversionSource};
use crate::tools::settings;
use crate::tools::status::StatusTracker;

/// Rice Calc MCP Service
#[derive(Clone)]
pub struct RiceCalcService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<RiceCalcService>,
    /// The session's calculator form
    calculator: Arc<std::sync::Mutex<CalculatorState>>,
}

impl RiceCalcService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
            calculator: Arc::new(std::sync::Mutex::new(CalculatorState::new())),
        }
    }

    fn calculator(&self) -> Result<MutexGuard<'_, CalculatorState>, McpError> {
        self.calculator
            .lock()
            .map_err(|_| McpError::internal_error("Calculator state lock poisoned", None))
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Parameter Structs
// ============================================================================

/// A form value: a JSON number or the raw text typed by the user
#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
#[serde(untagged)]
pub enum FormValue {
    Number(f64),
    Text(String),
}

impl FormValue {
    /// Numeric value, unset when it does not parse
    fn quantity(&self) -> Option<f64> {
        match self {
            FormValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            FormValue::Text(s) => parse_quantity(s),
        }
    }

    /// Whole count, unset when negative or unparseable
    fn count(&self) -> Option<u32> {
        match self {
            FormValue::Number(n) => parse_portion_count(&n.to_string()),
            FormValue::Text(s) => parse_portion_count(s),
        }
    }
}

fn quantity(value: &Option<FormValue>) -> Option<f64> {
    value.as_ref().and_then(FormValue::quantity)
}

fn portion_size(name: &str) -> Result<PortionSize, McpError> {
    PortionSize::from_str(name).ok_or_else(|| {
        McpError::invalid_params(
            format!("Unknown portion size '{}': use small, medium or large", name),
            None,
        )
    })
}

fn view_mode(name: &str) -> Result<ViewMode, McpError> {
    ViewMode::from_str(name).ok_or_else(|| {
        McpError::invalid_params(format!("Unknown view mode '{}': use mass or portions", name), None)
    })
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetMassParams {
    /// Grams (number or text). Omit or send "" to clear the field.
    pub value: Option<FormValue>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetPortionsParams {
    /// Number of portions
    pub count: Option<FormValue>,
    /// Portion size: small, medium or large
    pub size: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetViewModeParams {
    /// "mass" or "portions"
    pub mode: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetTextureParams {
    /// 0 (firm) to 100 (soft), 50 is neutral
    pub value: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertParams {
    /// Uncooked grams to convert from
    pub uncooked: Option<FormValue>,
    /// Cooked grams to convert from
    pub cooked: Option<FormValue>,
    /// Number of portions to convert from
    pub portions: Option<FormValue>,
    /// Portion size for `portions` (default medium)
    pub portion_size: Option<String>,
    /// Texture preference 0-100 (default 50)
    pub texture: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetYieldRatioParams {
    /// Cooked grams per uncooked gram
    pub value: Option<FormValue>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetPortionSizeParams {
    /// small, medium or large
    pub size: String,
    /// Grams of cooked rice in one portion
    pub grams: Option<FormValue>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalibrateYieldRatioParams {
    /// Uncooked grams that went into the cooker
    pub observed_uncooked: Option<FormValue>,
    /// Cooked grams that came out
    pub observed_cooked: Option<FormValue>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl RiceCalcService {
    // --- Status ---

    #[tool(description = "Get the current status of the rice calculator service including build info, database status, and process information")]
    async fn rice_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        json_result(&status)
    }

    #[tool(description = "Get instructions for using the rice calculator. Call this when unsure how the calculator tools fit together.")]
    fn calculator_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::CALCULATOR_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(CALCULATOR_INSTRUCTIONS)]))
    }

    // --- Calculator ---

    #[tool(description = "Get the calculator form: uncooked and cooked grams, water ml, texture, portion settings and bowl level")]
    fn get_calculator(&self) -> Result<CallToolResult, McpError> {
        let state = self.calculator()?;
        let result = calculator::get_calculator(&self.database, &state)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the uncooked rice grams. Cooked grams and water are recalculated.")]
    fn set_uncooked(&self, Parameters(p): Parameters<SetMassParams>) -> Result<CallToolResult, McpError> {
        let mut state = self.calculator()?;
        let result = calculator::update_field(&self.database, &mut state, FieldUpdate::Uncooked(quantity(&p.value)))
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the cooked rice grams wanted. Uncooked grams and water are recalculated.")]
    fn set_cooked(&self, Parameters(p): Parameters<SetMassParams>) -> Result<CallToolResult, McpError> {
        let mut state = self.calculator()?;
        let result = calculator::update_field(&self.database, &mut state, FieldUpdate::Cooked(quantity(&p.value)))
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Switch to portion mode and set the portion count and/or size (small, medium, large)")]
    fn set_portions(&self, Parameters(p): Parameters<SetPortionsParams>) -> Result<CallToolResult, McpError> {
        let size = p.size.as_deref().map(portion_size).transpose()?;
        let count = p.count.as_ref().and_then(FormValue::count);
        let mut state = self.calculator()?;
        let result = calculator::set_portions(&self.database, &mut state, count, size)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Switch the cooked side between mass entry (\"mass\") and portion entry (\"portions\")")]
    fn set_view_mode(&self, Parameters(p): Parameters<SetViewModeParams>) -> Result<CallToolResult, McpError> {
        let mode = view_mode(&p.mode)?;
        let mut state = self.calculator()?;
        let result = calculator::set_view_mode(&self.database, &mut state, mode)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the texture preference from 0 (firm) to 100 (soft). Adjusts water by up to 10%.")]
    fn set_texture(&self, Parameters(p): Parameters<SetTextureParams>) -> Result<CallToolResult, McpError> {
        let mut state = self.calculator()?;
        let result = calculator::update_field(&self.database, &mut state, FieldUpdate::Texture(p.value))
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Clear the calculator form")]
    fn reset_calculator(&self) -> Result<CallToolResult, McpError> {
        let mut state = self.calculator()?;
        let result = calculator::reset_calculator(&self.database, &mut state)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "One-shot conversion without changing the form. Give exactly one of uncooked, cooked or portions (with optional portion_size), plus optional texture.")]
    fn convert(&self, Parameters(p): Parameters<ConvertParams>) -> Result<CallToolResult, McpError> {
        let size = p.portion_size.as_deref().map(portion_size).transpose()?.unwrap_or_default();

        let source = match (&p.uncooked, &p.cooked, &p.portions) {
            (Some(v), None, None) => ConversionSource::Uncooked(v.quantity()),
            (None, Some(v), None) => ConversionSource::Cooked(v.quantity()),
            (None, None, Some(v)) => ConversionSource::Portions { count: v.count(), size },
            _ => {
                return Err(McpError::invalid_params(
                    "Provide exactly one of uncooked, cooked or portions",
                    None,
                ))
            }
        };

        let result = calculator::convert(&self.database, source, p.texture)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Calibration Settings ---

    #[tool(description = "Get the calibration settings: yield ratio and portion sizes in grams")]
    fn get_settings(&self) -> Result<CallToolResult, McpError> {
        let result = settings::get_settings(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the yield ratio (cooked grams per uncooked gram). Non-positive values are ignored.")]
    fn set_yield_ratio(&self, Parameters(p): Parameters<SetYieldRatioParams>) -> Result<CallToolResult, McpError> {
        let mut state = self.calculator()?;
        let result = settings::set_yield_ratio(&self.database, &mut state, quantity(&p.value))
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the grams of cooked rice in a small, medium or large portion. Non-positive values are ignored.")]
    fn set_portion_size(&self, Parameters(p): Parameters<SetPortionSizeParams>) -> Result<CallToolResult, McpError> {
        let size = portion_size(&p.size)?;
        let mut state = self.calculator()?;
        let result = settings::set_portion_size(&self.database, &mut state, size, quantity(&p.grams))
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Calibrate the yield ratio from a real cook: weigh the rice before and after. Ignored unless both weights are positive.")]
    fn calibrate_yield_ratio(&self, Parameters(p): Parameters<CalibrateYieldRatioParams>) -> Result<CallToolResult, McpError> {
        let mut state = self.calculator()?;
        let result = settings::calibrate_yield_ratio(
            &self.database,
            &mut state,
            quantity(&p.observed_uncooked),
            quantity(&p.observed_cooked),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for RiceCalcService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "rice-calc".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Rice Cooker Calculator".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Rice Cooker Calculator - rice and water amounts for a rice cooker. \
                 Call calculator_instructions first if unsure. \
                 Form: get_calculator, set_uncooked, set_cooked, set_portions, set_view_mode, set_texture, reset_calculator. \
                 Quick answers: convert. \
                 Calibration: get_settings, set_yield_ratio, set_portion_size, calibrate_yield_ratio."
                    .into(),
            ),
        }
    }
}
