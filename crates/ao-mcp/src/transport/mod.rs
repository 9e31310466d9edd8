//! Transport implementations for MCP
//!
//! Currently stdio only.

pub mod stdio;
