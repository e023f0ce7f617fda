//! Image generation backends used by the image tool.

#[cfg(feature = "openai-client")]
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[cfg(feature = "openai-client")]
pub use openai::OpenAiImageClient;

pub const RESPONSE_FORMAT_B64: &str = "b64_json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub quality: String,
    pub response_format: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    /// Base64 payload exactly as returned by the API.
    pub b64_json: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_prompt: Option<String>,
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse>;
}

pub type DynImageGenerator = Arc<dyn ImageGenerator>;
