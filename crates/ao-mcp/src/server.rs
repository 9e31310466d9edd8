//! MCP Server implementation
//!
//! The main server loop: read a frame from the transport, classify it,
//! dispatch, write the response.

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::client::{AoBridge, BridgeError};
use crate::config::AoConfig;
use crate::handlers::{handle_notification, handle_request, McpServerState};
use crate::protocol::{JsonRpcError, JsonRpcNotification, JsonRpcRequest, JsonRpcResponse};
use crate::transport::stdio::AsyncStdioTransport;

/// MCP Server
pub struct McpServer {
    state: McpServerState,
}

impl McpServer {
    /// Create a server connected to the configured network endpoints.
    pub fn connect(config: AoConfig) -> Result<Self, BridgeError> {
        let bridge = Arc::new(AoBridge::connect(&config)?);
        Ok(Self {
            state: McpServerState::new(bridge, Arc::new(config)),
        })
    }

    /// Create a server backed by the recording mock.
    pub fn with_mock(config: AoConfig) -> Self {
        Self {
            state: McpServerState::new(Arc::new(AoBridge::new_mock()), Arc::new(config)),
        }
    }

    /// Run the server using stdio transport
    pub async fn run_stdio(mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        info!("Starting AO MCP server (stdio transport)");

        let mut transport = AsyncStdioTransport::new();

        loop {
            // Read message
            let message = match transport.read_message().await {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    info!("EOF received, shutting down");
                    break;
                }
                Err(e) => {
                    error!("Error reading message: {}", e);
                    continue;
                }
            };

            // Parse JSON
            let json: serde_json::Value = match serde_json::from_str(&message) {
                Ok(v) => v,
                Err(e) => {
                    warn!("Failed to parse JSON: {}", e);
                    let error_response = JsonRpcResponse::error(
                        crate::protocol::RequestId::Null,
                        JsonRpcError::parse_error(),
                    );
                    if let Err(e) = transport.write_response(&error_response).await {
                        error!("Failed to write error response: {}", e);
                    }
                    continue;
                }
            };

            // Determine message type
            if json.get("id").is_some() && json.get("method").is_some() {
                // It's a request
                let request: JsonRpcRequest = match serde_json::from_value(json) {
                    Ok(r) => r,
                    Err(e) => {
                        warn!("Failed to parse request: {}", e);
                        continue;
                    }
                };

                let response = handle_request(&mut self.state, &request).await;

                if let Err(e) = transport.write_response(&response).await {
                    error!("Failed to write response: {}", e);
                }
            } else if json.get("method").is_some() {
                // It's a notification
                let notification: JsonRpcNotification = match serde_json::from_value(json) {
                    Ok(n) => n,
                    Err(e) => {
                        warn!("Failed to parse notification: {}", e);
                        continue;
                    }
                };

                if let Some(reply) = handle_notification(&mut self.state, &notification).await {
                    if let Err(e) = transport.write_notification(&reply).await {
                        error!("Failed to write notification: {}", e);
                    }
                }
            } else if json.get("id").is_some() {
                // A response to a server-initiated request; this server never
                // issues any.
                debug!("Received response from client (ignored)");
            } else {
                warn!("Unknown message type: {:?}", json);
            }
        }

        info!("AO MCP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_creation() {
        let server = McpServer::with_mock(AoConfig::default());
        assert!(server.state.bridge.mock().is_some());
        assert!(!server.state.initialized);
    }

    #[tokio::test]
    async fn test_connect_fails_without_keyfile() {
        let config = AoConfig {
            wallet_path: "/nonexistent/keyfile.json".into(),
            ..AoConfig::default()
        };
        assert!(McpServer::connect(config).is_err());
    }

    #[tokio::test]
    async fn test_connect_with_keyfile() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"kty":"RSA","n":"AQAB","e":"AQAB"}"#)
            .unwrap();

        let config = AoConfig {
            wallet_path: file.path().to_path_buf(),
            ..AoConfig::default()
        };
        let server = McpServer::connect(config).unwrap();
        assert!(server.state.bridge.mock().is_none());
    }
}
