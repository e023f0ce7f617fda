use std::process::Stdio;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, Command};
use tracing::{debug, info, instrument};

use crate::error::{Result, ToolCrewError};
use crate::servers::ToolServerDescriptor;

use super::protocol::{
    CallToolResult, JsonRpcRequest, JsonRpcResponse, ServerInfo, ToolDefinition,
    MCP_PROTOCOL_VERSION,
};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Request/response client for one tool server.
pub struct McpClient {
    server: String,
    lines: Lines<BufReader<BoxedReader>>,
    writer: BoxedWriter,
    next_id: u64,
    server_info: Option<ServerInfo>,
    // Held so the child is killed when the client is dropped.
    _child: Option<Child>,
}

impl McpClient {
    /// Wraps an already connected byte stream. No handshake is performed.
    pub fn new<R, W>(server: impl Into<String>, reader: R, writer: W) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            server: server.into(),
            lines: BufReader::new(Box::new(reader) as BoxedReader).lines(),
            writer: Box::new(writer),
            next_id: 1,
            server_info: None,
            _child: None,
        }
    }

    /// Starts the descriptor's process and completes the `initialize`
    /// handshake.
    #[instrument(skip(descriptor), fields(server = %descriptor.name))]
    pub async fn spawn(descriptor: &ToolServerDescriptor) -> Result<Self> {
        let mut child = Command::new(&descriptor.command)
            .args(&descriptor.args)
            .envs(&descriptor.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ToolCrewError::ToolUnavailable {
                server: descriptor.name.clone(),
                reason: format!("failed to start `{}`: {e}", descriptor.command),
            })?;

        let unavailable = |what: &str| ToolCrewError::ToolUnavailable {
            server: descriptor.name.clone(),
            reason: format!("child {what} was not captured"),
        };
        let stdin = child.stdin.take().ok_or_else(|| unavailable("stdin"))?;
        let stdout = child.stdout.take().ok_or_else(|| unavailable("stdout"))?;

        let mut client = Self::new(descriptor.name.clone(), stdout, stdin);
        client._child = Some(child);
        client.initialize().await?;
        Ok(client)
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn server_info(&self) -> Option<&ServerInfo> {
        self.server_info.as_ref()
    }

    pub async fn initialize(&mut self) -> Result<ServerInfo> {
        let result = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": MCP_PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                    }
                }),
            )
            .await?;
        let info: ServerInfo = serde_json::from_value(
            result.get("serverInfo").cloned().unwrap_or(Value::Null),
        )
        .map_err(|e| self.protocol(format!("bad initialize result: {e}")))?;
        self.notify("notifications/initialized").await?;
        info!(server = %self.server, remote = %info.name, "tool server connected");
        self.server_info = Some(info.clone());
        Ok(info)
    }

    pub async fn list_tools(&mut self) -> Result<Vec<ToolDefinition>> {
        let result = self.request("tools/list", json!({})).await?;
        let tools = result.get("tools").cloned().unwrap_or_else(|| json!([]));
        serde_json::from_value(tools).map_err(|e| self.protocol(format!("bad tools/list result: {e}")))
    }

    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<CallToolResult> {
        let result = self
            .request("tools/call", json!({ "name": name, "arguments": arguments }))
            .await?;
        serde_json::from_value(result).map_err(|e| self.protocol(format!("bad tools/call result: {e}")))
    }

    async fn notify(&mut self, method: &str) -> Result<()> {
        self.send(&JsonRpcRequest::notification(method)).await
    }

    async fn request(&mut self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;
        self.send(&JsonRpcRequest::new(id, method, params)).await?;

        loop {
            let line = self
                .lines
                .next_line()
                .await
                .map_err(|e| self.unavailable(format!("read failed: {e}")))?
                .ok_or_else(|| self.unavailable("server closed the connection".to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let response: JsonRpcResponse = match serde_json::from_str(&line) {
                Ok(response) => response,
                Err(_) => {
                    // Server-initiated requests and notifications share the stream.
                    debug!(server = %self.server, %line, "skipping non-response frame");
                    continue;
                }
            };
            if response.id != Value::from(id) {
                debug!(server = %self.server, id = %response.id, "skipping unrelated response");
                continue;
            }
            if let Some(error) = response.error {
                return Err(self.protocol(format!(
                    "{method} failed ({}): {}",
                    error.code, error.message
                )));
            }
            return Ok(response.result.unwrap_or(Value::Null));
        }
    }

    async fn send(&mut self, request: &JsonRpcRequest) -> Result<()> {
        let mut frame = serde_json::to_string(request)?;
        frame.push('\n');
        self.writer
            .write_all(frame.as_bytes())
            .await
            .map_err(|e| self.unavailable(format!("write failed: {e}")))?;
        self.writer
            .flush()
            .await
            .map_err(|e| self.unavailable(format!("flush failed: {e}")))
    }

    fn unavailable(&self, reason: String) -> ToolCrewError {
        ToolCrewError::ToolUnavailable {
            server: self.server.clone(),
            reason,
        }
    }

    fn protocol(&self, message: String) -> ToolCrewError {
        ToolCrewError::Protocol(format!("{}: {message}", self.server))
    }
}
