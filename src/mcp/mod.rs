//! Stdio tool transport: JSON-RPC 2.0 frames, one per line.

pub mod client;
pub mod protocol;
pub mod server;

pub use client::McpClient;
pub use protocol::{
    CallToolResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerInfo, ToolContent,
    ToolDefinition, MCP_PROTOCOL_VERSION,
};
pub use server::McpServer;
