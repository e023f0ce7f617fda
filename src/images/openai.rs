use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::config::credentials::OPENAI_API_KEY;
use crate::config::ImageServerConfig;
use crate::error::{Result, ToolCrewError};

use super::{ImageGenerationRequest, ImageGenerationResponse, ImageGenerator};

/// Client for `POST /images/generations`.
pub struct OpenAiImageClient {
    client: Client,
    base_url: String,
    api_key: String,
    organization: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl OpenAiImageClient {
    pub fn new<S1, S2>(base_url: S1, api_key: S2, organization: Option<String>) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            organization: organization.filter(|org| !org.is_empty()),
        }
    }

    pub fn from_config(config: &ImageServerConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.credentials.openai_api_key.clone(),
            config.credentials.organization().map(str::to_string),
        )
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageClient {
    #[instrument(skip(self, request), fields(model = %request.model, size = %request.size))]
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        if self.api_key.trim().is_empty() {
            return Err(ToolCrewError::CredentialMissing(OPENAI_API_KEY));
        }

        let url = format!("{}/images/generations", self.base_url);
        let body = json!({
            "model": request.model,
            "prompt": request.prompt,
            "size": request.size,
            "quality": request.quality,
            "response_format": request.response_format,
            "n": 1,
        });

        let mut builder = self.client.post(url).bearer_auth(&self.api_key).json(&body);
        if let Some(organization) = &self.organization {
            builder = builder.header("OpenAI-Organization", organization);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ToolCrewError::RemoteApi(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(ToolCrewError::RemoteApi(format!(
                "image generation failed with status {status}: {detail}"
            )));
        }

        let payload: ImagesResponse = response
            .json()
            .await
            .map_err(|e| ToolCrewError::RemoteApi(format!("malformed response: {e}")))?;
        let datum = payload
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ToolCrewError::RemoteApi("response contained no images".into()))?;
        let b64_json = datum
            .b64_json
            .ok_or_else(|| ToolCrewError::RemoteApi("response missing b64_json payload".into()))?;

        Ok(ImageGenerationResponse {
            b64_json,
            revised_prompt: datum.revised_prompt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_api_key_is_rejected_before_any_request() {
        let client = OpenAiImageClient::new("http://127.0.0.1:9", "", None);
        let err = client
            .generate(ImageGenerationRequest {
                model: "dall-e-3".into(),
                prompt: "a red circle".into(),
                size: "1024x1024".into(),
                quality: "hd".into(),
                response_format: "b64_json".into(),
            })
            .await
            .expect_err("empty key must fail");
        assert!(matches!(err, ToolCrewError::CredentialMissing(OPENAI_API_KEY)));
    }
}
