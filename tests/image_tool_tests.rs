mod support;

use std::sync::Arc;

use base64::prelude::*;
use serde_json::json;
use support::{FailingGenerator, FixedGenerator, ONE_PIXEL_PNG_B64};
use tempfile::TempDir;
use toolcrew::config::credentials::OPENAI_API_KEY;
use toolcrew::{
    Credentials, ImageCreationRequest, ImageCreationTool, ImageServerConfig, InvocationPhase,
    OpenAiImageClient, Tool, ToolInvocation, ToolInvocationResult,
};

fn config_in(dir: &TempDir) -> ImageServerConfig {
    ImageServerConfig::default().with_output_dir(dir.path().join("images"))
}

fn expected_path(dir: &TempDir, name: &str) -> String {
    format!("{}/{}.png", dir.path().join("images").display(), name)
}

#[tokio::test]
async fn success_writes_decoded_payload() {
    let dir = TempDir::new().unwrap();
    let generator = Arc::new(FixedGenerator::new(ONE_PIXEL_PNG_B64));
    let tool = ImageCreationTool::new(generator.clone(), &config_in(&dir));

    let result = tool
        .create(ImageCreationRequest::new("a red circle", "sample"))
        .await;

    let path = expected_path(&dir, "sample");
    assert_eq!(
        result,
        ToolInvocationResult::success(path.clone(), format!("Image saved successfully as {path}"))
    );
    let written = std::fs::read(&path).unwrap();
    assert!(!written.is_empty());
    assert_eq!(written, BASE64_STANDARD.decode(ONE_PIXEL_PNG_B64).unwrap());

    let decoded = image::load_from_memory(&written).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1, 1));
    assert_eq!(tool.phase(), InvocationPhase::Done);
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn request_uses_fixed_generation_parameters() {
    let dir = TempDir::new().unwrap();
    let generator = Arc::new(FixedGenerator::new(ONE_PIXEL_PNG_B64));
    let tool = ImageCreationTool::new(generator.clone(), &config_in(&dir));

    tool.create(ImageCreationRequest::new("a red circle", "params"))
        .await;

    let request = generator.last_request.lock().clone().expect("request captured");
    assert_eq!(request.model, "dall-e-3");
    assert_eq!(request.size, "1024x1024");
    assert_eq!(request.quality, "hd");
    assert_eq!(request.response_format, "b64_json");
    assert_eq!(
        request.prompt,
        "Generate an image based on the following prompt: a red circle"
    );
}

#[tokio::test]
async fn remote_failure_returns_failure_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let tool = ImageCreationTool::new(Arc::new(FailingGenerator), &config_in(&dir));

    let result = tool
        .create(ImageCreationRequest::new("a red circle", "broken"))
        .await;

    let error = result.error().expect("failure expected");
    assert!(error.contains("upstream unavailable"), "{error}");
    assert!(!std::path::Path::new(&expected_path(&dir, "broken")).exists());
    assert_eq!(tool.phase(), InvocationPhase::Failed);
}

#[tokio::test]
async fn malformed_payload_is_a_failure() {
    let dir = TempDir::new().unwrap();
    let tool = ImageCreationTool::new(Arc::new(FixedGenerator::new("***not base64***")), &config_in(&dir));

    let result = tool.create(ImageCreationRequest::new("a red circle", "garbage")).await;

    assert!(!result.is_success());
    assert!(result.error().unwrap().contains("invalid base64"));
    assert!(!std::path::Path::new(&expected_path(&dir, "garbage")).exists());
}

#[tokio::test]
async fn same_name_twice_overwrites_and_reports_same_path() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);

    let first = ImageCreationTool::new(Arc::new(FixedGenerator::new(ONE_PIXEL_PNG_B64)), &config)
        .create(ImageCreationRequest::new("first", "again"))
        .await;

    let replacement = BASE64_STANDARD.encode(b"second payload");
    let second = ImageCreationTool::new(Arc::new(FixedGenerator::new(replacement)), &config)
        .create(ImageCreationRequest::new("second", "again"))
        .await;

    assert_eq!(first.file_path(), second.file_path());
    let written = std::fs::read(expected_path(&dir, "again")).unwrap();
    assert_eq!(written, b"second payload");
}

#[tokio::test]
async fn existing_output_dir_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    std::fs::create_dir_all(&config.output_dir).unwrap();
    let tool = ImageCreationTool::new(Arc::new(FixedGenerator::new(ONE_PIXEL_PNG_B64)), &config);

    let first = tool.create(ImageCreationRequest::new("one", "first")).await;
    let second = tool.create(ImageCreationRequest::new("two", "second")).await;

    assert!(first.is_success());
    assert!(second.is_success());
}

#[tokio::test]
async fn missing_api_key_yields_credential_failure() {
    std::env::remove_var(OPENAI_API_KEY);
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir).with_credentials(Credentials::from_env());
    assert!(config.credentials.openai_api_key.is_empty());

    let client = OpenAiImageClient::from_config(&config);
    let tool = ImageCreationTool::new(Arc::new(client), &config);
    let result = tool.create(ImageCreationRequest::new("a red circle", "test1")).await;

    assert_eq!(
        result,
        ToolInvocationResult::failure("credential `OPENAI_API_KEY` is missing or empty")
    );
    assert!(!std::path::Path::new(&expected_path(&dir, "test1")).exists());
}

#[tokio::test]
async fn unsafe_image_name_is_rejected_before_generation() {
    let dir = TempDir::new().unwrap();
    let generator = Arc::new(FixedGenerator::new(ONE_PIXEL_PNG_B64));
    let tool = ImageCreationTool::new(generator.clone(), &config_in(&dir));

    let result = tool
        .create(ImageCreationRequest::new("a red circle", "../outside"))
        .await;

    assert!(result.error().unwrap().contains("image_name"));
    assert_eq!(generator.calls(), 0);
    assert!(!dir.path().join("outside.png").exists());
}

#[tokio::test]
async fn tool_call_serializes_result_payload() {
    let dir = TempDir::new().unwrap();
    let tool = ImageCreationTool::new(Arc::new(FixedGenerator::new(ONE_PIXEL_PNG_B64)), &config_in(&dir));

    let value = tool
        .call(ToolInvocation::new(
            "image_creation_openai",
            json!({"query": "a red circle", "image_name": "via_call"}),
        ))
        .await
        .unwrap();

    assert_eq!(value["success"], json!(true));
    assert_eq!(value["file_path"], json!(expected_path(&dir, "via_call")));
}

#[tokio::test]
async fn tool_call_rejects_missing_arguments() {
    let dir = TempDir::new().unwrap();
    let tool = ImageCreationTool::new(Arc::new(FixedGenerator::new(ONE_PIXEL_PNG_B64)), &config_in(&dir));

    let err = tool
        .call(ToolInvocation::new("image_creation_openai", json!({"query": "only"})))
        .await
        .expect_err("image_name is required");
    assert!(matches!(err, toolcrew::ToolCrewError::InvalidArgument { .. }));
}
