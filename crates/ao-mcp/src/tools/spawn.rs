//! Spawn process tool

use ao_client::Tag;
use serde::Deserialize;

use crate::protocol::{Tool, ToolAnnotations, ToolContent, ToolsCallResult};

use super::ToolContext;

/// Spawn input parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnParams {
    /// Tags attached to the new process, passed through unmodified
    pub tags: Vec<Tag>,

    /// Select the sqlite-enabled module instead of the default one
    #[serde(default)]
    pub needs_sqlite: bool,
}

/// Get the tool definition
pub fn tool_definition() -> Tool {
    Tool {
        name: "spawn".to_string(),
        title: Some("Spawn Process".to_string()),
        description: "Create a new process on the AO network and return its id. Pass \
                      needsSqlite to get a process whose module has sqlite compiled in. \
                      Spawning is permanent; processes cannot be deleted."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "tags": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "value": { "type": "string" }
                        },
                        "required": ["name", "value"]
                    },
                    "description": "Tags attached to the spawn, forwarded verbatim"
                },
                "needsSqlite": {
                    "type": "boolean",
                    "description": "Use the sqlite-enabled module"
                }
            },
            "required": ["tags"]
        }),
        output_schema: Some(serde_json::json!({
            "type": "object",
            "properties": {
                "processId": { "type": "string" },
                "module": { "type": "string" },
                "scheduler": { "type": "string" }
            },
            "required": ["processId"]
        })),
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

/// Execute the spawn tool
pub async fn execute(ctx: &ToolContext, arguments: serde_json::Value) -> ToolsCallResult {
    let params: SpawnParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    let module = ctx.config.module_for(params.needs_sqlite).to_string();
    let scheduler = ctx.config.scheduler_id.clone();

    let process_id = match ctx.bridge.spawn(&module, &scheduler, params.tags).await {
        Ok(id) => id,
        Err(e) => return ToolsCallResult::error(format!("Error spawning process: {}", e)),
    };

    let structured = serde_json::json!({
        "processId": process_id,
        "module": module,
        "scheduler": scheduler,
    });

    ToolsCallResult::success_with_structured(
        vec![ToolContent::text(format!(
            "Process spawned: {}",
            process_id
        ))],
        structured,
    )
}
