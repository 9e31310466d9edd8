//! MCP protocol types
//!
//! JSON-RPC 2.0 framing plus the MCP lifecycle and tool message types this
//! server speaks.

mod capabilities;
mod jsonrpc;
mod lifecycle;
mod messages;

pub use capabilities::*;
pub use jsonrpc::*;
pub use lifecycle::*;
pub use messages::*;
