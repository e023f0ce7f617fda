pub mod image_creation;
pub mod manifest;
pub mod registry;
pub mod result;
pub mod tool;

pub use image_creation::{
    artifact_path, ImageCreationRequest, ImageCreationTool, InvocationPhase, IMAGE_CREATION_TOOL,
};
pub use manifest::{ToolManifest, ToolManifestBuilder, ToolPort, ToolPortSchema};
pub use registry::ToolRegistry;
pub use result::ToolInvocationResult;
pub use tool::{Tool, ToolInvocation};
