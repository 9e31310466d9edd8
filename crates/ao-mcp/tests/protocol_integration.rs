//! Integration tests for MCP protocol flow
//!
//! These tests verify the complete protocol implementation: initialization,
//! capability negotiation, and tool listing/dispatch, all against the
//! recording mock.

use std::sync::Arc;

use ao_mcp::handlers::{handle_notification, handle_request, McpServerState};
use ao_mcp::protocol::*;
use ao_mcp::{AoBridge, AoConfig};

/// Helper to create a test server state
fn create_test_state() -> McpServerState {
    McpServerState::new(
        Arc::new(AoBridge::new_mock()),
        Arc::new(AoConfig::default()),
    )
}

/// Helper to create an initialized server state
fn create_initialized_state() -> McpServerState {
    let mut state = create_test_state();
    state.initialized = true;
    state.protocol_version = Some(MCP_PROTOCOL_VERSION.to_string());
    state
}

fn request(id: i64, method: &str, params: serde_json::Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: RequestId::Number(id),
        method: method.to_string(),
        params: Some(params),
    }
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

#[tokio::test]
async fn test_full_initialization_flow() {
    let mut state = create_test_state();

    let init_request = request(
        1,
        "initialize",
        serde_json::json!({
            "protocolVersion": "2025-06-18",
            "capabilities": {
                "roots": { "listChanged": true }
            },
            "clientInfo": {
                "name": "test-client",
                "version": "1.0.0"
            }
        }),
    );

    let response = handle_request(&mut state, &init_request).await;

    assert!(response.error.is_none(), "Initialize should succeed");
    let result = response.result.expect("Should have result");

    assert_eq!(result["protocolVersion"], "2025-06-18");
    assert!(result["capabilities"]["tools"].is_object());
    assert_eq!(result["serverInfo"]["name"], "ao-mcp");

    // Client acknowledges
    let initialized_notification = JsonRpcNotification {
        jsonrpc: "2.0".to_string(),
        method: "notifications/initialized".to_string(),
        params: None,
    };

    handle_notification(&mut state, &initialized_notification).await;

    assert!(state.initialized);
    assert_eq!(state.protocol_version.as_deref(), Some("2025-06-18"));
    assert_eq!(state.client_info.as_ref().unwrap().name, "test-client");
}

#[tokio::test]
async fn test_request_before_initialize_fails() {
    let mut state = create_test_state();

    let response =
        handle_request(&mut state, &request(1, "tools/list", serde_json::json!({}))).await;

    let error = response.error.unwrap();
    assert_eq!(error.code, -32002); // Server not initialized
}

#[tokio::test]
async fn test_ping_works_without_initialize() {
    let mut state = create_test_state();

    let req = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: RequestId::Number(1),
        method: "ping".to_string(),
        params: None,
    };

    let response = handle_request(&mut state, &req).await;
    assert!(response.error.is_none());
}

// ============================================================================
// Tools Tests
// ============================================================================

#[tokio::test]
async fn test_tools_list_returns_all_tools() {
    let mut state = create_initialized_state();

    let response =
        handle_request(&mut state, &request(1, "tools/list", serde_json::json!({}))).await;

    assert!(response.error.is_none());
    let result = response.result.unwrap();
    let tools = result["tools"].as_array().unwrap();

    let tool_names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();

    for expected in [
        "add",
        "calculate-bmi",
        "spawn",
        "send-message",
        "run-lua-code",
        "load-blueprint",
        "load-official-blueprint",
        "apm-install",
        "create-sqlite-db",
        "create-sqlite-table",
        "exec-sqlite-query",
        "list-available-handlers",
        "add-handler",
        "run-handler",
        "transaction",
    ] {
        assert!(tool_names.contains(&expected), "missing tool {}", expected);
    }

    // Verify tool structure
    for tool in tools {
        assert!(tool["name"].is_string());
        assert!(tool["description"].is_string());
        assert!(tool["inputSchema"].is_object());
    }
}

#[tokio::test]
async fn test_tools_call_add() {
    let mut state = create_initialized_state();

    let response = handle_request(
        &mut state,
        &request(
            1,
            "tools/call",
            serde_json::json!({
                "name": "add",
                "arguments": { "a": 2, "b": 3 }
            }),
        ),
    )
    .await;

    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(result["content"][0]["type"], "text");
    assert_eq!(result["content"][0]["text"], "5");
}

#[tokio::test]
async fn test_tools_call_spawn_returns_structured_content() {
    let mut state = create_initialized_state();

    let response = handle_request(
        &mut state,
        &request(
            1,
            "tools/call",
            serde_json::json!({
                "name": "spawn",
                "arguments": { "tags": [{"name": "Name", "value": "t"}] }
            }),
        ),
    )
    .await;

    let result = response.result.unwrap();
    assert!(result["structuredContent"]["processId"]
        .as_str()
        .unwrap()
        .starts_with("mock-process-"));
}

#[tokio::test]
async fn test_tools_call_unknown_tool() {
    let mut state = create_initialized_state();

    let response = handle_request(
        &mut state,
        &request(
            1,
            "tools/call",
            serde_json::json!({
                "name": "unknown_tool",
                "arguments": {}
            }),
        ),
    )
    .await;

    assert!(response.error.is_none()); // Tool errors live in the result
    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
}

#[tokio::test]
async fn test_tools_call_bad_arguments_is_tool_error() {
    let mut state = create_initialized_state();

    let response = handle_request(
        &mut state,
        &request(
            1,
            "tools/call",
            serde_json::json!({
                "name": "send-message",
                "arguments": { "data": "missing processId" }
            }),
        ),
    )
    .await;

    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_method() {
    let mut state = create_initialized_state();

    let response = handle_request(
        &mut state,
        &JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: RequestId::Number(1),
            method: "unknown/method".to_string(),
            params: None,
        },
    )
    .await;

    let error = response.error.unwrap();
    assert_eq!(error.code, -32601); // Method not found
}

#[tokio::test]
async fn test_invalid_params_envelope() {
    let mut state = create_initialized_state();

    let response = handle_request(
        &mut state,
        &request(1, "tools/call", serde_json::json!("not an object")),
    )
    .await;

    let error = response.error.unwrap();
    assert_eq!(error.code, -32602); // Invalid params
}

// ============================================================================
// JSON-RPC Compliance Tests
// ============================================================================

#[tokio::test]
async fn test_response_contains_same_id() {
    let mut state = create_initialized_state();

    let req = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: RequestId::String("test-id-123".to_string()),
        method: "tools/list".to_string(),
        params: Some(serde_json::json!({})),
    };

    let response = handle_request(&mut state, &req).await;
    assert_eq!(response.id, RequestId::String("test-id-123".to_string()));

    let response2 =
        handle_request(&mut state, &request(42, "tools/list", serde_json::json!({}))).await;
    assert_eq!(response2.id, RequestId::Number(42));
}

#[tokio::test]
async fn test_response_contains_jsonrpc_version() {
    let mut state = create_initialized_state();

    let response =
        handle_request(&mut state, &request(1, "tools/list", serde_json::json!({}))).await;
    assert_eq!(response.jsonrpc, "2.0");
}
