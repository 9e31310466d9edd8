//! MCP request handlers
//!
//! This module contains handlers for all MCP protocol methods.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::AoBridge;
use crate::config::AoConfig;
use crate::protocol::*;
use crate::tools::{self, ToolContext};

/// MCP Server state
pub struct McpServerState {
    /// Protocol version negotiated
    pub protocol_version: Option<String>,

    /// Whether initialized
    pub initialized: bool,

    /// Client capabilities
    pub client_capabilities: Option<ClientCapabilities>,

    /// Client info
    pub client_info: Option<ClientInfo>,

    /// Remote access, mock or real
    pub bridge: Arc<AoBridge>,

    /// Endpoints and fixed ids
    pub config: Arc<AoConfig>,
}

impl McpServerState {
    pub fn new(bridge: Arc<AoBridge>, config: Arc<AoConfig>) -> Self {
        Self {
            protocol_version: None,
            initialized: false,
            client_capabilities: None,
            client_info: None,
            bridge,
            config,
        }
    }

    pub fn tool_context(&self) -> ToolContext {
        ToolContext {
            bridge: Arc::clone(&self.bridge),
            config: Arc::clone(&self.config),
        }
    }
}

/// Handle an incoming JSON-RPC request
pub async fn handle_request(
    state: &mut McpServerState,
    request: &JsonRpcRequest,
) -> JsonRpcResponse {
    debug!("Handling request: {} (id: {})", request.method, request.id);

    // Check if initialized (except for initialize itself)
    if !state.initialized && request.method != "initialize" && request.method != "ping" {
        return JsonRpcResponse::error(request.id.clone(), JsonRpcError::not_initialized());
    }

    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(state, request).await,
        "ping" => handle_ping().await,

        // Tools
        "tools/list" => handle_tools_list(state, request).await,
        "tools/call" => handle_tools_call(state, request).await,

        // Unknown method
        _ => Err(JsonRpcError::method_not_found(&request.method)),
    };

    match result {
        Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
        Err(error) => JsonRpcResponse::error(request.id.clone(), error),
    }
}

/// Handle an incoming notification
pub async fn handle_notification(
    state: &mut McpServerState,
    notification: &JsonRpcNotification,
) -> Option<JsonRpcNotification> {
    debug!("Handling notification: {}", notification.method);

    match notification.method.as_str() {
        "notifications/initialized" => {
            info!("Client sent initialized notification");
            state.initialized = true;
            None
        }
        "notifications/cancelled" => {
            // Cancellation is the host transport's concern; the in-flight
            // remote call cannot be recalled anyway.
            if let Some(params) = &notification.params {
                match serde_json::from_value::<CancelledNotification>(params.clone()) {
                    Ok(cancelled) => warn!("Request cancelled: {}", cancelled.request_id),
                    Err(e) => debug!("Malformed cancelled notification: {}", e),
                }
            }
            None
        }
        _ => {
            debug!("Unknown notification: {}", notification.method);
            None
        }
    }
}

// ============================================================================
// Lifecycle Handlers
// ============================================================================

async fn handle_initialize(
    state: &mut McpServerState,
    request: &JsonRpcRequest,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: InitializeParams = request
        .params
        .as_ref()
        .ok_or_else(|| JsonRpcError::invalid_params("Missing params"))
        .and_then(|p| {
            serde_json::from_value(p.clone())
                .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
        })?;

    info!(
        "Initialize request from {} (version: {})",
        params.client_info.name, params.protocol_version
    );

    if params.protocol_version != MCP_PROTOCOL_VERSION {
        warn!(
            "Protocol version mismatch: client={}, server={}",
            params.protocol_version, MCP_PROTOCOL_VERSION
        );
        // Accepted anyway for compatibility
    }

    state.protocol_version = Some(params.protocol_version.clone());
    state.client_capabilities = Some(params.capabilities);
    state.client_info = Some(params.client_info);

    let result = InitializeResult::new(MCP_PROTOCOL_VERSION.to_string());

    serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

async fn handle_ping() -> Result<serde_json::Value, JsonRpcError> {
    Ok(serde_json::json!({}))
}

// ============================================================================
// Tools Handlers
// ============================================================================

async fn handle_tools_list(
    _state: &McpServerState,
    request: &JsonRpcRequest,
) -> Result<serde_json::Value, JsonRpcError> {
    let _params: ToolsListParams = request
        .params
        .as_ref()
        .map(|p| serde_json::from_value(p.clone()))
        .transpose()
        .map_err(|e| JsonRpcError::invalid_params(e.to_string()))?
        .unwrap_or_default();

    let result = ToolsListResult {
        tools: tools::get_all_tools(),
        next_cursor: None,
    };

    serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

async fn handle_tools_call(
    state: &McpServerState,
    request: &JsonRpcRequest,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: ToolsCallParams = request
        .params
        .as_ref()
        .ok_or_else(|| JsonRpcError::invalid_params("Missing params"))
        .and_then(|p| {
            serde_json::from_value(p.clone())
                .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
        })?;

    debug!("Calling tool: {}", params.name);

    let ctx = state.tool_context();
    let result = tools::execute_tool(&ctx, &params.name, params.arguments).await;

    serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}
