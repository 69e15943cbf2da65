//! nanoclaw-agent: the worker-side tool server
//!
//! Runs inside the sandbox next to the agent. Tools never touch the chat
//! transport, the scheduler or Things directly; they drop JSON files into
//! the group's IPC directory for the host to act on.

pub mod channel;
pub mod context;
pub mod mcp;
pub mod things;

pub use channel::{ChannelConfig, IpcChannel, ThingsOutcome};
pub use context::AgentContext;
pub use mcp::{McpError, McpServer, ToolHandlers};
