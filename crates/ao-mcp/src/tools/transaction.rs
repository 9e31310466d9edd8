//! Transaction summary tool

use serde::Deserialize;

use crate::protocol::{Tool, ToolAnnotations, ToolContent, ToolsCallResult};

use super::ToolContext;

/// Payload excerpt length included in the summary
const DATA_PREVIEW_CHARS: usize = 1000;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionParams {
    /// Ledger transaction id
    pub transaction_id: String,
}

/// Get the tool definition
pub fn tool_definition() -> Tool {
    Tool {
        name: "transaction".to_string(),
        title: Some("Inspect Transaction".to_string()),
        description: "Fetch a transaction from the Arweave gateway and summarize it: owner, \
                      recipient, quantity, fee, size, tags, and the first 1000 characters \
                      of the payload."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "transactionId": {
                    "type": "string",
                    "description": "Transaction id to look up"
                }
            },
            "required": ["transactionId"]
        }),
        output_schema: Some(serde_json::json!({
            "type": "object",
            "properties": {
                "id": { "type": "string" },
                "owner": { "type": "string" },
                "recipient": { "type": "string" },
                "quantity": { "type": "string" },
                "fee": { "type": "string" },
                "size": { "type": "string" },
                "data": { "type": "string", "maxLength": 1000 },
                "tags": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": { "type": "string" },
                            "value": { "type": "string" }
                        }
                    }
                }
            },
            "required": ["id"]
        })),
        annotations: Some(ToolAnnotations::remote_read()),
    }
}

/// Execute the transaction tool
pub async fn execute(ctx: &ToolContext, arguments: serde_json::Value) -> ToolsCallResult {
    let params: TransactionParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    let metadata = match ctx.bridge.tx_metadata(&params.transaction_id).await {
        Ok(m) => m,
        Err(e) => {
            return ToolsCallResult::error(format!(
                "Error fetching transaction {}: {}",
                params.transaction_id, e
            ));
        }
    };

    let data = match ctx.bridge.tx_data(&params.transaction_id).await {
        Ok(d) => d,
        Err(e) => {
            return ToolsCallResult::error(format!(
                "Error fetching payload of {}: {}",
                params.transaction_id, e
            ));
        }
    };

    let preview: String = data.chars().take(DATA_PREVIEW_CHARS).collect();

    let summary = serde_json::json!({
        "id": metadata.id,
        "owner": metadata.owner,
        "recipient": metadata.target,
        "quantity": metadata.quantity,
        "fee": metadata.reward,
        "size": metadata.data_size,
        "data": preview,
        "tags": metadata.decoded_tags(),
    });

    let text = serde_json::to_string_pretty(&summary)
        .unwrap_or_else(|_| summary.to_string());

    ToolsCallResult::success_with_structured(vec![ToolContent::text(text)], summary)
}
