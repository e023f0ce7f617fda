use std::sync::Arc;

use toolcrew::logging::LoggingConfig;
use toolcrew::{image_tool_registry, DynImageGenerator, ImageServerConfig, McpServer, OpenAiImageClient};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    LoggingConfig::init();

    let config = ImageServerConfig::from_env();
    let generator: DynImageGenerator = Arc::new(OpenAiImageClient::from_config(&config));
    let registry = image_tool_registry(generator, &config)?;
    let server = McpServer::new("image_server", registry);

    eprintln!("Image Creation MCP Server running on stdio");
    info!(output_dir = %config.output_dir.display(), model = %config.model, "serving");
    server.serve_stdio().await?;
    Ok(())
}
