mod support;

use std::sync::Arc;

use serde_json::{json, Value};
use support::{FixedGenerator, ONE_PIXEL_PNG_B64};
use tempfile::TempDir;
use tokio::io::{duplex, split};
use toolcrew::mcp::protocol::{JsonRpcRequest, METHOD_NOT_FOUND, PARSE_ERROR};
use toolcrew::{
    build_descriptor, image_tool_registry, ImageServerConfig, McpClient, McpServer,
    ToolCrewError, ToolInvocationResult, IMAGE_CREATION_TOOL,
};

fn image_server(dir: &TempDir) -> McpServer {
    let config = ImageServerConfig::default().with_output_dir(dir.path().join("images"));
    let registry = image_tool_registry(Arc::new(FixedGenerator::new(ONE_PIXEL_PNG_B64)), &config)
        .expect("image tool registers");
    McpServer::new("image_server", registry)
}

/// Serves `server` on one end of an in-memory pipe and returns a client on
/// the other.
fn connect(server: McpServer) -> McpClient {
    let (client_end, server_end) = duplex(64 * 1024);
    let (server_read, server_write) = split(server_end);
    tokio::spawn(async move {
        let _ = server.serve(server_read, server_write).await;
    });
    let (client_read, client_write) = split(client_end);
    McpClient::new("image", client_read, client_write)
}

#[tokio::test]
async fn handshake_and_discovery() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut client = connect(image_server(&dir));

    let info = client.initialize().await?;
    assert_eq!(info.name, "image_server");

    let tools = client.list_tools().await?;
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0].name, IMAGE_CREATION_TOOL);
    assert_eq!(tools[0].input_schema["required"], json!(["query", "image_name"]));
    Ok(())
}

#[tokio::test]
async fn tool_call_round_trips_result_payload() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut client = connect(image_server(&dir));
    client.initialize().await?;

    let result = client
        .call_tool(
            IMAGE_CREATION_TOOL,
            json!({"query": "a red circle", "image_name": "remote"}),
        )
        .await?;
    assert!(!result.is_error);

    let payload: ToolInvocationResult = serde_json::from_str(&result.joined_text())?;
    let expected = format!("{}/remote.png", dir.path().join("images").display());
    assert_eq!(payload.file_path(), Some(expected.as_str()));
    assert!(std::path::Path::new(&expected).exists());
    Ok(())
}

#[tokio::test]
async fn unknown_tool_is_reported_as_tool_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let mut client = connect(image_server(&dir));
    client.initialize().await?;

    let result = client.call_tool("nope", json!({})).await?;
    assert!(result.is_error);
    assert!(result.joined_text().contains("tool `nope` not registered"));
    Ok(())
}

#[tokio::test]
async fn server_answers_protocol_errors() {
    let dir = TempDir::new().unwrap();
    let server = image_server(&dir);

    let parse = server.handle_line("{not json").await.expect("response");
    assert_eq!(parse.error.map(|e| e.code), Some(PARSE_ERROR));
    assert_eq!(parse.id, Value::Null);

    let unknown = server
        .handle_request(&JsonRpcRequest::new(7, "resources/list", json!({})))
        .await
        .expect("response");
    assert_eq!(unknown.id, json!(7));
    assert_eq!(unknown.error.map(|e| e.code), Some(METHOD_NOT_FOUND));

    let notification = server
        .handle_request(&JsonRpcRequest::notification("notifications/initialized"))
        .await;
    assert!(notification.is_none());
}

#[tokio::test]
async fn spawning_a_missing_command_is_tool_unavailable() {
    let descriptor = build_descriptor(
        "ghost",
        "toolcrew-definitely-not-installed",
        Vec::<String>::new(),
        Vec::<(String, String)>::new(),
    );
    let err = McpClient::spawn(&descriptor)
        .await
        .err()
        .expect("spawn must fail");
    assert!(matches!(err, ToolCrewError::ToolUnavailable { ref server, .. } if server == "ghost"));
}
