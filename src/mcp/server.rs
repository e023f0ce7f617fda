use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::error::{Result, ToolCrewError};
use crate::tools::{ToolInvocation, ToolRegistry};

use super::protocol::{
    CallToolResult, JsonRpcRequest, JsonRpcResponse, ServerInfo, ToolDefinition, INTERNAL_ERROR,
    INVALID_PARAMS, MCP_PROTOCOL_VERSION, METHOD_NOT_FOUND, PARSE_ERROR,
};

/// Serves a [`ToolRegistry`] over newline-delimited JSON-RPC, one request
/// at a time.
pub struct McpServer {
    info: ServerInfo,
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(name: impl Into<String>, registry: ToolRegistry) -> Self {
        Self {
            info: ServerInfo {
                name: name.into(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
            registry,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.registry
            .manifests()
            .into_iter()
            .map(|manifest| ToolDefinition {
                name: manifest.name.clone(),
                description: manifest.description.clone().unwrap_or_default(),
                input_schema: manifest.input_schema(),
            })
            .collect()
    }

    /// Parses one frame and answers it. Notifications yield `None`.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.handle_request(&request).await,
            Err(e) => {
                warn!(error = %e, "unparseable request frame");
                Some(JsonRpcResponse::error(Value::Null, PARSE_ERROR, e.to_string()))
            }
        }
    }

    pub async fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        let Some(id) = request.id.clone() else {
            debug!(method = %request.method, "notification received");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!({
                    "protocolVersion": MCP_PROTOCOL_VERSION,
                    "serverInfo": self.info,
                    "capabilities": {
                        "tools": { "listChanged": false }
                    }
                }),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => {
                JsonRpcResponse::success(id, json!({ "tools": self.tool_definitions() }))
            }
            "tools/call" => {
                let Some(name) = request.params.get("name").and_then(Value::as_str) else {
                    return Some(JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        "tools/call requires a `name`",
                    ));
                };
                let arguments = request
                    .params
                    .get("arguments")
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                let result = self.call_tool(name, arguments).await;
                encode_result(id, serde_json::to_value(result))
            }
            other => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        };
        Some(response)
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> CallToolResult {
        info!(tool = %name, "tool call");
        match self
            .registry
            .invoke(ToolInvocation::new(name, arguments))
            .await
        {
            Ok(Value::String(text)) => CallToolResult::text(text),
            Ok(value) => CallToolResult::text(value.to_string()),
            Err(err) => {
                warn!(tool = %name, error = %err, "tool call rejected");
                CallToolResult::error(format!("Tool error: {err}"))
            }
        }
    }

    /// Reads frames until EOF, answering each before reading the next.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = BufReader::new(reader).lines();
        while let Some(line) = lines.next_line().await.map_err(io_error)? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut frame = serde_json::to_string(&response)?;
                frame.push('\n');
                writer.write_all(frame.as_bytes()).await.map_err(io_error)?;
                writer.flush().await.map_err(io_error)?;
            }
        }
        info!("input closed; shutting down");
        Ok(())
    }

    pub async fn serve_stdio(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }
}

/// A result we failed to encode is our fault, not the caller's frame.
fn encode_result(id: Value, encoded: serde_json::Result<Value>) -> JsonRpcResponse {
    match encoded {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
    }
}

fn io_error(err: std::io::Error) -> ToolCrewError {
    ToolCrewError::Protocol(format!("transport I/O failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_failure_is_an_internal_error() {
        let failure = serde_json::from_str::<Value>("{").map(|_| Value::Null);
        let response = encode_result(json!(3), failure);
        assert_eq!(response.id, json!(3));
        assert_eq!(response.error.map(|e| e.code), Some(INTERNAL_ERROR));

        let ok = encode_result(json!(4), Ok(json!({"content": []})));
        assert!(ok.error.is_none());
        assert_eq!(ok.result, Some(json!({"content": []})));
    }
}
