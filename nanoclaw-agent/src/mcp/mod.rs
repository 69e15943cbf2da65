//! MCP (Model Context Protocol) server
//!
//! Exposes the worker's tools to the agent over line-delimited JSON-RPC on
//! stdin/stdout. Nothing else may write to stdout.

mod error;
mod handlers;
mod protocol;
mod server;
mod tools;

pub use error::McpError;
pub use handlers::ToolHandlers;
pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Tool, ToolContent, ToolResult};
pub use server::McpServer;
pub use tools::get_tool_definitions;
