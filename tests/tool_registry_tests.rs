mod support;

use std::sync::Arc;

use serde_json::{json, Value};
use support::{FixedGenerator, ONE_PIXEL_PNG_B64};
use toolcrew::{
    image_tool_registry, ImageServerConfig, ToolCrewError, ToolInvocation, ToolManifest, ToolPort,
    ToolPortSchema, ToolRegistry, IMAGE_CREATION_TOOL,
};

struct SimpleTool;

#[async_trait::async_trait]
impl toolcrew::Tool for SimpleTool {
    fn name(&self) -> &'static str {
        "simple"
    }

    async fn call(&self, invocation: ToolInvocation) -> toolcrew::Result<Value> {
        Ok(json!({ "echo": invocation.input }))
    }
}

#[test]
fn tool_manifest_builder_populates_fields() {
    let manifest = ToolManifest::builder("simple")
        .description("echo-like tool")
        .input(
            ToolPort::new("text")
                .with_description("input payload")
                .with_schema(ToolPortSchema::new().with_type("string"))
                .required(),
        )
        .output(ToolPort::new("result").with_schema(
            ToolPortSchema::new().with_json_schema(json!({"type": "object"})),
        ))
        .permission("fs.read")
        .build();

    assert_eq!(manifest.name, "simple");
    assert_eq!(manifest.description.as_deref(), Some("echo-like tool"));
    assert_eq!(manifest.inputs.len(), 1);
    assert_eq!(manifest.outputs.len(), 1);
    assert_eq!(manifest.permissions, vec!["fs.read"]);
    assert_eq!(
        manifest.input_schema(),
        json!({
            "type": "object",
            "properties": {"text": {"type": "string", "description": "input payload"}},
            "required": ["text"]
        })
    );
}

struct MisnamedTool;

#[async_trait::async_trait]
impl toolcrew::Tool for MisnamedTool {
    fn name(&self) -> &'static str {
        "real_name"
    }

    fn manifest(&self) -> ToolManifest {
        ToolManifest::builder("typo_name").build()
    }

    async fn call(&self, _invocation: ToolInvocation) -> toolcrew::Result<Value> {
        Ok(Value::Null)
    }
}

#[test]
fn register_reports_self_declared_manifest_mismatch() {
    let mut registry = ToolRegistry::new();
    let err = registry
        .register(Arc::new(MisnamedTool))
        .expect_err("mismatched manifest must not register silently");
    assert!(matches!(err, ToolCrewError::ManifestMismatch { ref name, .. } if name == "real_name"));
    assert!(registry.is_empty());

    registry.register(Arc::new(SimpleTool)).expect("consistent tool registers");
    assert_eq!(registry.len(), 1);
}

#[test]
fn tool_registry_manifest_mismatch_returns_error() {
    let tool: Arc<dyn toolcrew::Tool> = Arc::new(SimpleTool);
    let manifest = ToolManifest::builder("other").build();

    let mut registry = ToolRegistry::new();
    let err = registry
        .register_with_manifest(tool, manifest)
        .expect_err("should fail");
    match err {
        ToolCrewError::ManifestMismatch { kind, name } => {
            assert_eq!(kind, "tool");
            assert_eq!(name, "simple");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn invoke_unknown_tool_is_not_registered() {
    let registry = ToolRegistry::new();
    let err = registry
        .invoke(ToolInvocation::new("missing", json!({})))
        .await
        .expect_err("unknown tool");
    assert!(matches!(err, ToolCrewError::ToolNotRegistered(name) if name == "missing"));
}

#[tokio::test]
async fn invoke_validates_against_manifest() -> anyhow::Result<()> {
    let mut registry = ToolRegistry::new();
    registry.register_with_manifest(
        Arc::new(SimpleTool),
        ToolManifest::builder("simple")
            .input(
                ToolPort::new("text")
                    .with_schema(ToolPortSchema::new().with_type("string"))
                    .required(),
            )
            .build(),
    )?;

    let err = registry
        .invoke(ToolInvocation::new("simple", json!({"text": 5})))
        .await
        .expect_err("wrong type");
    assert!(matches!(err, ToolCrewError::InvalidArgument { ref name, .. } if name == "text"));

    let value = registry
        .invoke(ToolInvocation::new("simple", json!({"text": "hi"})))
        .await?;
    assert_eq!(value, json!({"echo": {"text": "hi"}}));
    Ok(())
}

#[test]
fn image_registry_exposes_the_fixed_tool_name() {
    let registry = image_tool_registry(
        Arc::new(FixedGenerator::new(ONE_PIXEL_PNG_B64)),
        &ImageServerConfig::default(),
    )
    .expect("image tool registers");

    assert_eq!(registry.names(), vec![IMAGE_CREATION_TOOL.to_string()]);
    let manifest = registry.manifest(IMAGE_CREATION_TOOL).expect("manifest");
    assert_eq!(
        manifest.description.as_deref(),
        Some("Create an image using OpenAI's Images API")
    );
    let schema = manifest.input_schema();
    assert_eq!(schema["required"], json!(["query", "image_name"]));
    assert_eq!(schema["properties"]["query"]["type"], json!("string"));
}
