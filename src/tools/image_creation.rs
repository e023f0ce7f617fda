//! `image_creation_openai`: turns a text prompt into a PNG on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::prelude::*;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::ImageServerConfig;
use crate::error::{Result, ToolCrewError};
use crate::images::{DynImageGenerator, ImageGenerationRequest, RESPONSE_FORMAT_B64};
use crate::tools::manifest::{ToolManifest, ToolPort, ToolPortSchema};
use crate::tools::result::ToolInvocationResult;
use crate::tools::tool::{Tool, ToolInvocation};

pub const IMAGE_CREATION_TOOL: &str = "image_creation_openai";
pub const IMAGE_CREATION_DESCRIPTION: &str = "Create an image using OpenAI's Images API";

const PROMPT_PREFIX: &str = "Generate an image based on the following prompt: ";

/// Where a single invocation currently is. `Done` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvocationPhase {
    Idle,
    Generating,
    Writing,
    Done,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCreationRequest {
    pub query: String,
    pub image_name: String,
}

impl ImageCreationRequest {
    pub fn new(query: impl Into<String>, image_name: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            image_name: image_name.into(),
        }
    }
}

pub struct ImageCreationTool {
    generator: DynImageGenerator,
    output_dir: PathBuf,
    model: String,
    size: String,
    quality: String,
    phase: Mutex<InvocationPhase>,
}

impl ImageCreationTool {
    pub fn new(generator: DynImageGenerator, config: &ImageServerConfig) -> Self {
        Self {
            generator,
            output_dir: config.output_dir.clone(),
            model: config.model.clone(),
            size: config.size.clone(),
            quality: config.quality.clone(),
            phase: Mutex::new(InvocationPhase::Idle),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Phase reached by the most recent invocation.
    pub fn phase(&self) -> InvocationPhase {
        *self.phase.lock()
    }

    /// Runs one invocation. Never returns an error: every failure becomes
    /// `ToolInvocationResult::Failure`.
    pub async fn create(&self, request: ImageCreationRequest) -> ToolInvocationResult {
        self.transition(InvocationPhase::Idle);
        match self.try_create(&request).await {
            Ok(file_path) => {
                self.transition(InvocationPhase::Done);
                info!(%file_path, "image saved");
                let message = format!("Image saved successfully as {file_path}");
                ToolInvocationResult::success(file_path, message)
            }
            Err(err) => {
                self.transition(InvocationPhase::Failed);
                warn!(image_name = %request.image_name, error = %err, "image creation failed");
                ToolInvocationResult::failure(err)
            }
        }
    }

    async fn try_create(&self, request: &ImageCreationRequest) -> Result<String> {
        validate_query(&request.query)?;
        validate_image_name(&request.image_name)?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ToolCrewError::Filesystem {
                path: self.output_dir.display().to_string(),
                source,
            })?;

        self.transition(InvocationPhase::Generating);
        let response = self
            .generator
            .generate(ImageGenerationRequest {
                model: self.model.clone(),
                prompt: format!("{PROMPT_PREFIX}{}", request.query),
                size: self.size.clone(),
                quality: self.quality.clone(),
                response_format: RESPONSE_FORMAT_B64.to_string(),
            })
            .await?;

        let bytes = BASE64_STANDARD
            .decode(response.b64_json.trim())
            .map_err(|e| ToolCrewError::RemoteApi(format!("invalid base64 image payload: {e}")))?;
        if bytes.is_empty() {
            return Err(ToolCrewError::RemoteApi("empty image payload".into()));
        }
        match image::guess_format(&bytes) {
            Ok(image::ImageFormat::Png) => {}
            Ok(format) => debug!(?format, "payload is not PNG; writing verbatim"),
            Err(_) => debug!("payload format not recognised; writing verbatim"),
        }

        let file_path = artifact_path(&self.output_dir, &request.image_name);
        self.transition(InvocationPhase::Writing);
        tokio::fs::write(&file_path, &bytes)
            .await
            .map_err(|source| ToolCrewError::Filesystem {
                path: file_path.clone(),
                source,
            })?;
        Ok(file_path)
    }

    fn transition(&self, next: InvocationPhase) {
        let mut phase = self.phase.lock();
        debug!(from = ?*phase, to = ?next, "image invocation phase");
        *phase = next;
    }
}

/// `{output_dir}/{image_name}.png`
pub fn artifact_path(output_dir: &Path, image_name: &str) -> String {
    format!("{}/{}.png", output_dir.display(), image_name)
}

fn validate_query(query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Err(ToolCrewError::InvalidArgument {
            name: "query".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Names are used as a single path component under the output directory.
fn validate_image_name(image_name: &str) -> Result<()> {
    let reason = if image_name.trim().is_empty() {
        Some("must not be empty")
    } else if image_name.contains(['/', '\\', '\0']) {
        Some("must not contain path separators")
    } else if image_name.starts_with('.') {
        Some("must not start with `.`")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ToolCrewError::InvalidArgument {
            name: "image_name".to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl Tool for ImageCreationTool {
    fn name(&self) -> &'static str {
        IMAGE_CREATION_TOOL
    }

    fn manifest(&self) -> ToolManifest {
        let string = || ToolPortSchema::new().with_type("string");
        ToolManifest::builder(IMAGE_CREATION_TOOL)
            .description(IMAGE_CREATION_DESCRIPTION)
            .input(
                ToolPort::new("query")
                    .with_description("Prompt describing the image to generate")
                    .with_schema(string())
                    .required(),
            )
            .input(
                ToolPort::new("image_name")
                    .with_description("File name without extension; saved as <output_dir>/<image_name>.png")
                    .with_schema(string())
                    .required(),
            )
            .output(ToolPort::new("result").with_schema(
                ToolPortSchema::new()
                    .with_type("ToolInvocationResult")
                    .with_json_schema(json!({
                        "oneOf": [
                            {
                                "type": "object",
                                "required": ["success", "file_path", "message"],
                                "properties": {
                                    "success": {"const": true},
                                    "file_path": {"type": "string"},
                                    "message": {"type": "string"}
                                }
                            },
                            {
                                "type": "object",
                                "required": ["success", "error"],
                                "properties": {
                                    "success": {"const": false},
                                    "error": {"type": "string"}
                                }
                            }
                        ]
                    })),
            ))
            .permission("fs.write")
            .permission("net.openai")
            .build()
    }

    async fn call(&self, invocation: ToolInvocation) -> Result<Value> {
        let request: ImageCreationRequest = serde_json::from_value(invocation.input)
            .map_err(|e| ToolCrewError::InvalidArgument {
                name: "arguments".to_string(),
                reason: e.to_string(),
            })?;
        let result = self.create(request).await;
        Ok(serde_json::to_value(result)?)
    }
}
