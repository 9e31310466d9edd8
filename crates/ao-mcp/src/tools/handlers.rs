//! Process handler tools
//!
//! Handlers are the named message routes a process registers. These tools
//! list them, register new ones, and invoke one by its action name.

use ao_client::Tag;
use serde::Deserialize;

use crate::protocol::{Tool, ToolAnnotations, ToolsCallResult};

use super::{eval_in_process, ToolContext};

const LIST_HANDLERS_SNIPPET: &str = "\
local names = {}\n\
for _, handler in ipairs(Handlers.list) do\n\
\x20\x20table.insert(names, handler.name)\n\
end\n\
return table.concat(names, \"\\n\")";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHandlersParams {
    pub process_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddHandlerParams {
    pub process_id: String,

    /// Lua source registering the handler (a `Handlers.add(...)` call)
    pub handler_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunHandlerParams {
    pub process_id: String,

    /// Action name the handler matches on
    pub handler_name: String,

    /// Message payload
    pub data: String,
}

pub fn list_tool_definition() -> Tool {
    Tool {
        name: "list-available-handlers".to_string(),
        title: Some("List Handlers".to_string()),
        description: "List the names of the message handlers registered in a process."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "processId": {
                    "type": "string",
                    "description": "Id of the process to inspect"
                }
            },
            "required": ["processId"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

pub fn add_tool_definition() -> Tool {
    Tool {
        name: "add-handler".to_string(),
        title: Some("Add Handler".to_string()),
        description: "Register a new message handler in a process by evaluating the given \
                      Handlers.add(...) source."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "processId": {
                    "type": "string",
                    "description": "Id of the process to register the handler in"
                },
                "handlerCode": {
                    "type": "string",
                    "description": "Lua source registering the handler"
                }
            },
            "required": ["processId", "handlerCode"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

pub fn run_tool_definition() -> Tool {
    Tool {
        name: "run-handler".to_string(),
        title: Some("Run Handler".to_string()),
        description: "Send a message tagged with the given action name so the matching \
                      handler runs, and return the full computed result (outbox messages \
                      included) as JSON."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "processId": {
                    "type": "string",
                    "description": "Id of the process to message"
                },
                "handlerName": {
                    "type": "string",
                    "description": "Action name the target handler matches on"
                },
                "data": {
                    "type": "string",
                    "description": "Message payload"
                }
            },
            "required": ["processId", "handlerName", "data"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

/// Execute the list handlers tool
pub async fn execute_list(ctx: &ToolContext, arguments: serde_json::Value) -> ToolsCallResult {
    let params: ListHandlersParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    match eval_in_process(ctx, &params.process_id, LIST_HANDLERS_SNIPPET, vec![]).await {
        Ok(output) if output.is_empty() => {
            ToolsCallResult::text(format!("No handlers registered in {}", params.process_id))
        }
        Ok(output) => ToolsCallResult::text(format!(
            "Handlers in {}:\n{}",
            params.process_id, output
        )),
        Err(e) => ToolsCallResult::error(format!(
            "Error listing handlers in {}: {}",
            params.process_id, e
        )),
    }
}

/// Execute the add handler tool
pub async fn execute_add(ctx: &ToolContext, arguments: serde_json::Value) -> ToolsCallResult {
    let params: AddHandlerParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    match eval_in_process(ctx, &params.process_id, &params.handler_code, vec![]).await {
        Ok(output) if output.is_empty() => {
            ToolsCallResult::text(format!("Handler registered in {}", params.process_id))
        }
        Ok(output) => ToolsCallResult::text(output),
        Err(e) => ToolsCallResult::error(format!(
            "Error registering handler in {}: {}",
            params.process_id, e
        )),
    }
}

/// Execute the run handler tool
pub async fn execute_run(ctx: &ToolContext, arguments: serde_json::Value) -> ToolsCallResult {
    let params: RunHandlerParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    let tags = vec![Tag::new("Action", &params.handler_name)];

    let message_id = match ctx
        .bridge
        .send(&params.process_id, &params.data, tags)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            return ToolsCallResult::error(format!(
                "Error invoking handler {} in {}: {}",
                params.handler_name, params.process_id, e
            ));
        }
    };

    let result = match ctx.bridge.read_result(&message_id, &params.process_id).await {
        Ok(r) => r,
        Err(e) => {
            return ToolsCallResult::error(format!(
                "Handler {} invoked, but reading the result failed: {}",
                params.handler_name, e
            ));
        }
    };

    if let Some(error) = result.error {
        return ToolsCallResult::error(format!("Process reported an error: {}", error));
    }

    // Handler invocations matter for their outbox as much as their console
    // output, so return the whole result object.
    match serde_json::to_string_pretty(&result) {
        Ok(json) => ToolsCallResult::text(json),
        Err(e) => ToolsCallResult::error(format!("Result could not be rendered: {}", e)),
    }
}
