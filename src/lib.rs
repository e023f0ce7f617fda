pub mod config;
pub mod crew;
pub mod error;
pub mod images;
pub mod mcp;
pub mod orchestration;
pub mod servers;
pub mod tools;
pub mod utils;

pub use config::{Credentials, EnvConfig, ImageServerConfig};
pub use crew::{
    AgentProfile, Crew, CrewOutput, McpTaskExecutor, TaskContext, TaskExecutor, TaskOutput,
    TaskSpec, TaskStep,
};
pub use error::{Result, ToolCrewError};
pub use images::{DynImageGenerator, ImageGenerationRequest, ImageGenerationResponse, ImageGenerator};
#[cfg(feature = "openai-client")]
pub use images::OpenAiImageClient;
pub use mcp::{CallToolResult, McpClient, McpServer, ToolDefinition};
pub use servers::{build_descriptor, ToolServerDescriptor};
pub use tools::{
    ImageCreationRequest, ImageCreationTool, InvocationPhase, Tool, ToolInvocation,
    ToolInvocationResult, ToolManifest, ToolManifestBuilder, ToolPort, ToolPortSchema,
    ToolRegistry, IMAGE_CREATION_TOOL,
};
pub use utils::logging;

/// Registry holding the image creation tool, as served by `image-server`.
pub fn image_tool_registry(
    generator: DynImageGenerator,
    config: &ImageServerConfig,
) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(std::sync::Arc::new(ImageCreationTool::new(generator, config)))?;
    Ok(registry)
}
