#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use toolcrew::{ImageGenerationRequest, ImageGenerationResponse, ImageGenerator, ToolCrewError};

/// A valid 1x1 RGBA PNG.
pub const ONE_PIXEL_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub struct FixedGenerator {
    pub b64: String,
    pub calls: Arc<AtomicUsize>,
    pub last_request: parking_lot::Mutex<Option<ImageGenerationRequest>>,
}

impl FixedGenerator {
    pub fn new(b64: impl Into<String>) -> Self {
        Self {
            b64: b64.into(),
            calls: Arc::new(AtomicUsize::new(0)),
            last_request: parking_lot::Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerator for FixedGenerator {
    async fn generate(
        &self,
        request: ImageGenerationRequest,
    ) -> toolcrew::Result<ImageGenerationResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request);
        Ok(ImageGenerationResponse {
            b64_json: self.b64.clone(),
            revised_prompt: None,
        })
    }
}

pub struct FailingGenerator;

#[async_trait]
impl ImageGenerator for FailingGenerator {
    async fn generate(
        &self,
        _request: ImageGenerationRequest,
    ) -> toolcrew::Result<ImageGenerationResponse> {
        Err(ToolCrewError::RemoteApi(
            "image generation failed with status 500 Internal Server Error: upstream unavailable"
                .to_string(),
        ))
    }
}
