//! MCP server over stdio
//!
//! Requests are read line by line. `tools/call` runs as its own task so a
//! Things request waiting on the host does not block other calls; every
//! response goes through one writer task, in completion order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::error::McpError;
use super::handlers::ToolHandlers;
use super::protocol::{
    InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolsListResult,
};
use super::tools::{get_tool_definitions, is_known_tool};

/// MCP server bound to one worker's tool surface
pub struct McpServer {
    handlers: ToolHandlers,
    initialized: AtomicBool,
}

impl McpServer {
    pub fn new(handlers: ToolHandlers) -> Self {
        Self {
            handlers,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Relaxed)
    }

    /// Serve until `reader` reaches EOF and every in-flight call has answered
    ///
    /// Returns the writer so callers can inspect or reuse it.
    pub async fn serve<R, W>(self: Arc<Self>, reader: R, writer: W) -> Result<W, McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer_task = tokio::spawn(write_responses(writer, rx));

        info!("MCP server starting");

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            debug!("Received: {}", line);

            let request: JsonRpcRequest = match serde_json::from_str(line) {
                Ok(req) => req,
                Err(e) => {
                    warn!(error = %e, "Unparseable JSON-RPC message");
                    let _ = tx.send(JsonRpcResponse::error(
                        serde_json::Value::Null,
                        JsonRpcError::new(JsonRpcError::PARSE_ERROR, e.to_string()),
                    ));
                    continue;
                }
            };

            let Some(id) = request.id.clone() else {
                self.handle_notification(&request);
                continue;
            };

            if request.jsonrpc != "2.0" {
                let _ = tx.send(JsonRpcResponse::error(
                    id,
                    JsonRpcError::with_data(
                        JsonRpcError::INVALID_REQUEST,
                        "Invalid JSON-RPC version",
                        serde_json::json!({"expected": "2.0", "got": request.jsonrpc}),
                    ),
                ));
                continue;
            }

            if request.method == "tools/call" {
                let server = Arc::clone(&self);
                let tx = tx.clone();
                tokio::spawn(async move {
                    let response = match server.handle_tools_call(request.params).await {
                        Ok(value) => JsonRpcResponse::success(id, value),
                        Err(e) => JsonRpcResponse::error(id, e.into()),
                    };
                    let _ = tx.send(response);
                });
                continue;
            }

            let _ = tx.send(self.handle_request(id, &request));
        }

        info!("MCP server input closed");
        drop(tx);

        writer_task
            .await
            .map_err(|e| McpError::Internal(format!("writer task failed: {}", e)))?
    }

    fn handle_notification(&self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" | "initialized" => info!("Client initialized"),
            other => debug!(method = other, "Ignoring notification"),
        }
    }

    /// Handle every method except `tools/call`
    fn handle_request(&self, id: serde_json::Value, request: &JsonRpcRequest) -> JsonRpcResponse {
        let result = match request.method.as_str() {
            "initialize" => self.handle_initialize(),
            "ping" => Ok(serde_json::json!({})),
            "tools/list" => self.handle_tools_list(),
            _ => Err(McpError::MethodNotFound(request.method.clone())),
        };

        match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, e.into()),
        }
    }

    fn handle_initialize(&self) -> Result<serde_json::Value, McpError> {
        self.initialized.store(true, Ordering::Relaxed);
        info!(
            group = %self.handlers.context().group_folder,
            is_main = self.handlers.context().is_main,
            "MCP server initialized"
        );
        Ok(serde_json::to_value(InitializeResult::default())?)
    }

    fn handle_tools_list(&self) -> Result<serde_json::Value, McpError> {
        let result = ToolsListResult {
            tools: get_tool_definitions(),
        };
        Ok(serde_json::to_value(result)?)
    }

    async fn handle_tools_call(&self, mut params: serde_json::Value) -> Result<serde_json::Value, McpError> {
        let name = params["name"]
            .as_str()
            .ok_or_else(|| McpError::InvalidParams("Missing 'name' parameter".into()))?
            .to_string();

        if !is_known_tool(&name) {
            return Err(McpError::UnknownTool(name));
        }

        let arguments = params["arguments"].take();
        let result = self.handlers.call(&name, arguments).await?;
        Ok(serde_json::to_value(result)?)
    }
}

async fn write_responses<W>(
    mut writer: W,
    mut rx: mpsc::UnboundedReceiver<JsonRpcResponse>,
) -> Result<W, McpError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(response) = rx.recv().await {
        let mut json = serde_json::to_string(&response)?;
        debug!("Sending: {}", json);
        json.push('\n');
        writer.write_all(json.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(writer)
}
