use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

use super::manifest::ToolManifest;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub name: String,
    pub input: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl ToolInvocation {
    pub fn new<T: Into<String>>(name: T, input: Value) -> Self {
        Self {
            name: name.into(),
            input,
            metadata: None,
        }
    }
}

/// A remotely callable operation.
///
/// `call` returns `Err` only when the invocation itself is unusable (bad
/// arguments); domain failures are part of the returned payload.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;

    fn manifest(&self) -> ToolManifest {
        ToolManifest::builder(self.name()).build()
    }

    async fn call(&self, invocation: ToolInvocation) -> Result<Value>;
}
