//! sqlite tools
//!
//! These tools generate Lua for a process whose module has lsqlite3 compiled
//! in (spawn with needsSqlite). Caller queries are embedded as long-bracket
//! literals, never by quoted interpolation.

use serde::Deserialize;

use crate::format::lua_string_literal;
use crate::protocol::{Tool, ToolAnnotations, ToolsCallResult};

use super::{eval_in_process, ToolContext};

const OPEN_DB_SNIPPET: &str = "\
local sqlite3 = require(\"lsqlite3\")\n\
db = db or sqlite3.open_memory()\n\
return \"sqlite database ready\"";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDbParams {
    /// Process spawned with sqlite support
    pub process_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// Process holding the database
    pub process_id: String,

    /// SQL to execute
    pub query: String,
}

pub fn create_db_tool_definition() -> Tool {
    Tool {
        name: "create-sqlite-db".to_string(),
        title: Some("Create sqlite Database".to_string()),
        description: "Open an in-memory sqlite database inside a process spawned with \
                      needsSqlite. Call this before any other sqlite tool."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "processId": {
                    "type": "string",
                    "description": "Id of a process whose module has sqlite compiled in"
                }
            },
            "required": ["processId"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

pub fn create_table_tool_definition() -> Tool {
    Tool {
        name: "create-sqlite-table".to_string(),
        title: Some("Create sqlite Table".to_string()),
        description: "Run a CREATE TABLE statement against the process database."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "processId": {
                    "type": "string",
                    "description": "Id of the process holding the database"
                },
                "query": {
                    "type": "string",
                    "description": "CREATE TABLE statement"
                }
            },
            "required": ["processId", "query"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

pub fn exec_query_tool_definition() -> Tool {
    Tool {
        name: "exec-sqlite-query".to_string(),
        title: Some("Execute sqlite Query".to_string()),
        description: "Run a query against the process database and return the rows as JSON."
            .to_string(),
        input_schema: serde_json::json!({
            "type": "object",
            "properties": {
                "processId": {
                    "type": "string",
                    "description": "Id of the process holding the database"
                },
                "query": {
                    "type": "string",
                    "description": "SQL query to run"
                }
            },
            "required": ["processId", "query"]
        }),
        output_schema: None,
        annotations: Some(ToolAnnotations::remote_write()),
    }
}

/// Execute the create database tool
pub async fn execute_create_db(ctx: &ToolContext, arguments: serde_json::Value) -> ToolsCallResult {
    let params: CreateDbParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    match eval_in_process(ctx, &params.process_id, OPEN_DB_SNIPPET, vec![]).await {
        Ok(output) => ToolsCallResult::text(output),
        Err(e) => ToolsCallResult::error(format!(
            "Error creating database in {}: {}",
            params.process_id, e
        )),
    }
}

/// Execute the create table tool
pub async fn execute_create_table(
    ctx: &ToolContext,
    arguments: serde_json::Value,
) -> ToolsCallResult {
    let params: QueryParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    let code = format!(
        "local rc = db:exec({})\n\
         if rc ~= 0 then\n\
         \x20\x20return \"exec failed with code \" .. rc\n\
         end\n\
         return \"table created\"",
        lua_string_literal(&params.query)
    );

    match eval_in_process(ctx, &params.process_id, &code, vec![]).await {
        Ok(output) => ToolsCallResult::text(output),
        Err(e) => ToolsCallResult::error(format!(
            "Error creating table in {}: {}",
            params.process_id, e
        )),
    }
}

/// Execute the query tool
pub async fn execute_query(ctx: &ToolContext, arguments: serde_json::Value) -> ToolsCallResult {
    let params: QueryParams = match serde_json::from_value(arguments) {
        Ok(p) => p,
        Err(e) => return ToolsCallResult::error(format!("Invalid parameters: {}", e)),
    };

    let code = format!(
        "local json = require(\"json\")\n\
         local rows = {{}}\n\
         for row in db:nrows({}) do\n\
         \x20\x20table.insert(rows, row)\n\
         end\n\
         return json.encode(rows)",
        lua_string_literal(&params.query)
    );

    match eval_in_process(ctx, &params.process_id, &code, vec![]).await {
        Ok(output) => ToolsCallResult::text(output),
        Err(e) => ToolsCallResult::error(format!(
            "Error running query in {}: {}",
            params.process_id, e
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{AoBridge, RecordedCall};
    use crate::config::AoConfig;
    use std::sync::Arc;

    fn mock_context() -> ToolContext {
        ToolContext {
            bridge: Arc::new(AoBridge::new_mock()),
            config: Arc::new(AoConfig::default()),
        }
    }

    fn sent_code(ctx: &ToolContext) -> String {
        match &ctx.bridge.mock().unwrap().recorded_calls()[0] {
            RecordedCall::Message { data, .. } => data.clone(),
            other => panic!("expected message call, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_db_sends_fixed_snippet() {
        let ctx = mock_context();
        execute_create_db(&ctx, serde_json::json!({"processId": "p"})).await;

        let code = sent_code(&ctx);
        assert!(code.contains("require(\"lsqlite3\")"));
        assert!(code.contains("open_memory()"));
    }

    #[tokio::test]
    async fn test_create_table_embeds_query_in_long_bracket() {
        let ctx = mock_context();
        execute_create_table(
            &ctx,
            serde_json::json!({
                "processId": "p",
                "query": "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)"
            }),
        )
        .await;

        let code = sent_code(&ctx);
        assert!(code.contains("db:exec([=[\nCREATE TABLE users"));
        assert!(code.contains("]=])"));
    }

    #[tokio::test]
    async fn test_query_with_closing_bracket_cannot_escape() {
        let ctx = mock_context();
        execute_query(
            &ctx,
            serde_json::json!({
                "processId": "p",
                "query": "SELECT ']=]' FROM t; --"
            }),
        )
        .await;

        // The payload's level-1 bracket is inert inside a level-2 literal.
        let code = sent_code(&ctx);
        assert!(code.contains("[==[\nSELECT ']=]' FROM t; --]==]"));
    }

    #[tokio::test]
    async fn test_query_failure_is_error_result() {
        let ctx = mock_context();
        ctx.bridge.mock().unwrap().set_fail("no such process");

        let result = execute_query(
            &ctx,
            serde_json::json!({"processId": "p", "query": "SELECT 1"}),
        )
        .await;
        assert_eq!(result.is_error, Some(true));
    }
}
