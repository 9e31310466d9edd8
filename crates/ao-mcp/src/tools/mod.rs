//! AO MCP tool definitions
//!
//! One module per remote flow. Every tool follows the same contract: parse
//! arguments, perform at most one or two remote calls, return a single text
//! block. Failures of any kind come back as error results, never as protocol
//! faults.

mod blueprint;
mod eval;
mod handlers;
mod message;
mod spawn;
mod sqlite;
mod transaction;

use std::sync::Arc;

use ao_client::Tag;
use serde::Deserialize;

use crate::client::{AoBridge, BridgeError};
use crate::config::AoConfig;
use crate::format;
use crate::protocol::{Tool, ToolAnnotations, ToolsCallResult};

/// Tool execution context
pub struct ToolContext {
    /// Remote access, mock or real
    pub bridge: Arc<AoBridge>,

    /// Fixed module/scheduler ids and endpoints
    pub config: Arc<AoConfig>,
}

/// Get all tool definitions
pub fn get_all_tools() -> Vec<Tool> {
    vec![
        add_tool_definition(),
        bmi_tool_definition(),
        spawn::tool_definition(),
        message::tool_definition(),
        eval::tool_definition(),
        blueprint::load_tool_definition(),
        blueprint::load_official_tool_definition(),
        blueprint::apm_install_tool_definition(),
        sqlite::create_db_tool_definition(),
        sqlite::create_table_tool_definition(),
        sqlite::exec_query_tool_definition(),
        handlers::list_tool_definition(),
        handlers::add_tool_definition(),
        handlers::run_tool_definition(),
        transaction::tool_definition(),
    ]
}

/// Execute a tool by name
pub async fn execute_tool(
    ctx: &ToolContext,
    name: &str,
    arguments: serde_json::Value,
) -> ToolsCallResult {
    match name {
        "add" => execute_add(arguments),
        "calculate-bmi" => execute_bmi(arguments),
        "spawn" => spawn::execute(ctx, arguments).await,
        "send-message" => message::execute(ctx, arguments).await,
        "run-lua-code" => eval::execute(ctx, arguments).await,
        "load-blueprint" => blueprint::execute_load(ctx, arguments).await,
        "load-official-blueprint" => blueprint::execute_load_official(ctx, arguments).await,
        "apm-install" => blueprint::execute_apm_install(ctx, arguments).await,
        "create-sqlite-db" => sqlite::execute_create_db(ctx, arguments).await,
        "create-sqlite-table" => sqlite::execute_create_table(ctx, arguments).await,
        "exec-sqlite-query" => sqlite::execute_query(ctx, arguments).await,
        "list-available-handlers" => handlers::execute_list(ctx, arguments).await,
        "add-handler" => handlers::execute_add(ctx, arguments).await,
        "run-handler" => handlers::execute_run(ctx, arguments).await,
        "transaction" => transaction::execute(ctx, arguments).await,
        _ => ToolsCallResult::error(format!("Unknown tool: {}", name)),
    }
}

/// Shared eval flow: send `code` to the process as an `Eval` action, await
/// the result, surface process errors, clean up the output text.
pub(crate) async fn eval_in_process(
    ctx: &ToolContext,
    process_id: &str,
    code: &str,
    extra_tags: Vec<Tag>,
) -> Result<String, BridgeError> {
    let result = ctx.bridge.eval(process_id, code, extra_tags).await?;
    if let Some(error) = result.error {
        return Err(BridgeError::Remote(error));
    }
    Ok(format::clean_output(
        result.output_text().as_deref().unwrap_or(""),
    ))
}

// ============================================================================
// Local arithmetic tools (no remote calls; smoke tests for the tool surface)
// ============================================================================

#[derive(Debug, Deserialize)]
struct AddParams {
    a: f64,
    b: f64,
}

fn add_tool_definition() -> Tool {
    Tool {
        name: "add".to_string(),
        title: Some("Add Two Numbers".to_string()),
        description: "Add two numbers and return the sum as text.".to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "a": { "type": "number" },
                "b": { "type": "number" }
            },
            "required": ["a", "b"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::local()),
    }
}

fn execute_add(arguments: serde_json::Value) -> ToolsCallResult {
    let params: AddParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };
    ToolsCallResult::text(format!("{}", params.a + params.b))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BmiParams {
    weight_kg: f64,
    height_m: f64,
}

fn bmi_tool_definition() -> Tool {
    Tool {
        name: "calculate-bmi".to_string(),
        title: Some("Calculate BMI".to_string()),
        description: "Calculate body mass index from weight in kilograms and height in meters."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "weightKg": { "type": "number" },
                "heightM": { "type": "number" }
            },
            "required": ["weightKg", "heightM"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::local()),
    }
}

fn execute_bmi(arguments: serde_json::Value) -> ToolsCallResult {
    let params: BmiParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };
    ToolsCallResult::text(format!(
        "{}",
        params.weight_kg / (params.height_m * params.height_m)
    ))
}
