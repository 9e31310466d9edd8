//! Run Lua code tool

use ao_client::Tag;
use serde::Deserialize;

use crate::protocol::{Tool, ToolAnnotations, ToolsCallResult};

use super::{eval_in_process, ToolContext};

/// Run Lua code input parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunLuaParams {
    /// Lua source to evaluate
    pub code: String,

    /// Process to evaluate it in
    pub process_id: String,

    /// Extra tags attached to the eval message
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Get the tool definition
pub fn tool_definition() -> Tool {
    Tool {
        name: "run-lua-code".to_string(),
        title: Some("Run Lua Code".to_string()),
        description: "Evaluate Lua source inside a process and return its console output, \
                      with terminal color codes stripped."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "code": {
                    "type": "string",
                    "description": "Lua source to evaluate"
                },
                "processId": {
                    "type": "string",
                    "description": "Id of the process to evaluate in"
                },
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
                    "description": "Extra tags attached to the eval message"
                }
            },
            "required": ["code", "processId"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

/// Execute the run Lua code tool
pub async fn execute(ctx: &ToolContext, arguments: serde_json::Value) -> ToolsCallResult {
    let params: RunLuaParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    match eval_in_process(ctx, &params.process_id, &params.code, params.tags).await {
        Ok(output) => ToolsCallResult::text(output),
        Err(e) => ToolsCallResult::error(format!(
            "Error evaluating code in {}: {}",
            params.process_id, e
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AoBridge, RecordedCall};
    use crate::config::AoConfig;
    use crate::protocol::ToolContent;
    use std::sync::Arc;

    fn mock_context() -> ToolContext {
        ToolContext {
            bridge: Arc::new(AoBridge::new_mock()),
            config: Arc::new(AoConfig::default()),
        }
    }

    fn text_of(result: &ToolsCallResult) -> &str {
        match &result.content[0] {
            ToolContent::Text { text } => text,
        }
    }

    #[tokio::test]
    async fn test_run_lua_sends_eval_action() {
        let ctx = mock_context();
        let args = serde_json::json!({
            "code": "return 1 + 1",
            "processId": "proc-9"
        });

        let result = execute(&ctx, args).await;
        assert!(result.is_error.is_none());

        let calls = ctx.bridge.mock().unwrap().recorded_calls();
        match &calls[0] {
            RecordedCall::Message { process, data, tags } => {
                assert_eq!(process, "proc-9");
                assert_eq!(data, "return 1 + 1");
                assert_eq!(tags[0], Tag::new("Action", "Eval"));
            }
            other => panic!("expected message call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_lua_cleans_output() {
        let ctx = mock_context();
        ctx.bridge
            .mock()
            .unwrap()
            .set_eval_output("\u{1b}[32mline1\u{1b}[0m\\nline2");

        let result = execute(
            &ctx,
            serde_json::json!({"code": "print('x')", "processId": "p"}),
        )
        .await;

        assert_eq!(text_of(&result), "line1\nline2");
    }

    #[tokio::test]
    async fn test_run_lua_remote_failure_is_error_result() {
        let ctx = mock_context();
        ctx.bridge.mock().unwrap().set_fail("cu timed out");

        let result = execute(
            &ctx,
            serde_json::json!({"code": "return 1", "processId": "p"}),
        )
        .await;
        assert_eq!(result.is_error, Some(true));
    }
}
