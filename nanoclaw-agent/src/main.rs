//! nanoclaw-mcp: stdio MCP server for the sandboxed agent
//!
//! Logs go to stderr; stdout carries only JSON-RPC.

use std::sync::Arc;

use tokio::io::BufReader;

use nanoclaw_agent::{AgentContext, McpServer, ToolHandlers};
use nanoclaw_utils::{init_logging_with_config, LogConfig, NanoclawError, Result};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging_with_config(LogConfig::agent())?;

    let ctx = match AgentContext::from_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("nanoclaw-mcp cannot start: {}", e);
            return Err(e);
        }
    };
    tracing::info!(
        group = %ctx.group_folder,
        is_main = ctx.is_main,
        ipc_dir = %ctx.ipc_dir.display(),
        "nanoclaw-mcp starting"
    );

    let server = Arc::new(McpServer::new(ToolHandlers::for_context(ctx)));
    let stdin = BufReader::new(tokio::io::stdin());

    match server.serve(stdin, tokio::io::stdout()).await {
        Ok(_) => {
            tracing::info!("nanoclaw-mcp exiting normally");
            Ok(())
        }
        Err(e) => {
            tracing::error!("nanoclaw-mcp error: {}", e);
            Err(NanoclawError::protocol(e.to_string()))
        }
    }
}
