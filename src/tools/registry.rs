use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ToolCrewError};
use crate::tools::manifest::ToolManifest;
use crate::tools::tool::{Tool, ToolInvocation};

#[derive(Clone)]
struct ToolEntry {
    tool: Arc<dyn Tool>,
    manifest: Arc<ToolManifest>,
}

/// Name-to-handler table populated explicitly at process startup.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolEntry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Registers `tool` with the manifest it declares for itself.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let manifest = tool.manifest();
        self.insert(tool, manifest)
    }

    pub fn register_with_manifest(
        &mut self,
        tool: Arc<dyn Tool>,
        manifest: ToolManifest,
    ) -> Result<()> {
        self.insert(tool, manifest)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).map(|entry| Arc::clone(&entry.tool))
    }

    pub fn manifest(&self, name: &str) -> Option<Arc<ToolManifest>> {
        self.tools.get(name).map(|entry| Arc::clone(&entry.manifest))
    }

    /// Manifests ordered by tool name.
    pub fn manifests(&self) -> Vec<Arc<ToolManifest>> {
        self.tools
            .values()
            .map(|entry| Arc::clone(&entry.manifest))
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validates the arguments against the manifest, then dispatches.
    pub async fn invoke(&self, invocation: ToolInvocation) -> Result<Value> {
        let entry = self
            .tools
            .get(&invocation.name)
            .ok_or_else(|| ToolCrewError::ToolNotRegistered(invocation.name.clone()))?;
        entry.manifest.validate_input(&invocation.input)?;
        debug!(tool = %invocation.name, "dispatching tool invocation");
        entry.tool.call(invocation).await
    }

    fn insert(&mut self, tool: Arc<dyn Tool>, manifest: ToolManifest) -> Result<()> {
        if manifest.name != tool.name() {
            return Err(ToolCrewError::ManifestMismatch {
                kind: "tool",
                name: tool.name().to_string(),
            });
        }

        self.tools.insert(
            tool.name().to_string(),
            ToolEntry {
                tool,
                manifest: Arc::new(manifest),
            },
        );
        Ok(())
    }
}
