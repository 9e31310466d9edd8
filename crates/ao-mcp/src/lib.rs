//! AO MCP Server
//!
//! This crate implements a Model Context Protocol (MCP) server that lets any
//! MCP-compatible AI agent drive the AO compute network: spawning processes,
//! sending them messages, evaluating Lua inside them, loading blueprints, and
//! inspecting Arweave transactions.
//!
//! Every tool is a thin, schema-validated pass-through: arguments are
//! marshalled into one or two remote calls and the result comes back as a
//! single text block. There is no state kept between calls beyond the wallet
//! credential loaded at startup.
//!
//! # Transport
//!
//! stdio only: newline-delimited JSON-RPC 2.0 on stdin/stdout, logs on
//! stderr (for Claude Desktop, VS Code, and similar hosts).
//!
//! # Example Usage
//!
//! ```no_run
//! use ao_mcp::{AoConfig, McpServer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = McpServer::with_mock(AoConfig::default());
//!     server.run_stdio().await.expect("server failed");
//! }
//! ```

pub mod client;
pub mod config;
pub mod format;
pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use client::{AoBridge, BridgeError, MockNetwork, RecordedCall};
pub use config::AoConfig;
pub use protocol::{
    ClientCapabilities, ClientInfo, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION,
    ServerCapabilities, ServerInfo, Tool, ToolContent, ToolsCallResult,
};
pub use server::McpServer;
pub use tools::ToolContext;
