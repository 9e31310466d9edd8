//! Send message tool

use ao_client::Tag;
use serde::Deserialize;

use crate::format;
use crate::protocol::{Tool, ToolAnnotations, ToolContent, ToolsCallResult};

use super::ToolContext;

/// Send message input parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    /// Target process id
    pub process_id: String,

    /// Message payload
    pub data: String,

    /// Tags attached to the message, passed through unmodified
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Get the tool definition
pub fn tool_definition() -> Tool {
    Tool {
        name: "send-message".to_string(),
        title: Some("Send Message".to_string()),
        description: "Send a message to a process, wait for it to be computed, and return \
                      the message id together with the process output."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "processId": {
                    "type": "string",
                    "description": "Id of the process to message"
                },
                "data": {
                    "type": "string",
                    "description": "Message payload"
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
                    "description": "Tags attached to the message, forwarded verbatim"
                }
            },
            "required": ["processId", "data"]
        }),
        output_schema: Some(serde_json::json!({
            "type": "object",
            "properties": {
                "messageId": { "type": "string" },
                "output": { "type": "string" }
            },
            "required": ["messageId"]
        })),
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

/// Execute the send message tool
pub async fn execute(ctx: &ToolContext, arguments: serde_json::Value) -> ToolsCallResult {
    let params: SendMessageParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    let message_id = match ctx
        .bridge
        .send(&params.process_id, &params.data, params.tags)
        .await
    {
        Ok(id) => id,
        Err(e) => {
            return ToolsCallResult::error(format!(
                "Error sending message to {}: {}",
                params.process_id, e
            ));
        }
    };

    let result = match ctx.bridge.read_result(&message_id, &params.process_id).await {
        Ok(r) => r,
        Err(e) => {
            return ToolsCallResult::error(format!(
                "Message {} sent, but reading its result failed: {}",
                message_id, e
            ));
        }
    };

    if let Some(error) = result.error {
        return ToolsCallResult::error(format!("Process reported an error: {}", error));
    }

    let output = format::clean_output(result.output_text().as_deref().unwrap_or(""));

    let structured = serde_json::json!({
        "messageId": message_id,
        "output": output,
    });

    let text = if output.is_empty() {
        format!("Message sent: {}", message_id)
    } else {
        format!("Message sent: {}\n{}", message_id, output)
    };

    ToolsCallResult::success_with_structured(vec![ToolContent::text(text)], structured)
}
