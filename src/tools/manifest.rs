use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Result, ToolCrewError};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<ToolPort>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<ToolPort>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
}

impl ToolManifest {
    pub fn builder(name: impl Into<String>) -> ToolManifestBuilder {
        ToolManifestBuilder::new(name)
    }

    /// JSON Schema for the tool arguments, as advertised by `tools/list`.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for port in &self.inputs {
            let mut property = port
                .schema
                .as_ref()
                .and_then(|schema| schema.json_schema.clone())
                .unwrap_or_else(|| {
                    let type_name = port
                        .schema
                        .as_ref()
                        .and_then(|schema| schema.type_name.clone())
                        .unwrap_or_else(|| "string".to_string());
                    json!({ "type": type_name })
                });
            if let (Some(description), Some(obj)) = (&port.description, property.as_object_mut()) {
                obj.entry("description")
                    .or_insert_with(|| Value::String(description.clone()));
            }
            properties.insert(port.name.clone(), property);
            if port.required {
                required.push(Value::String(port.name.clone()));
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Checks that `input` is an object carrying every required port with
    /// the declared primitive type.
    pub fn validate_input(&self, input: &Value) -> Result<()> {
        let Some(obj) = input.as_object() else {
            return Err(ToolCrewError::InvalidArgument {
                name: "arguments".to_string(),
                reason: format!("`{}` expects an object, got {}", self.name, input),
            });
        };
        for port in self.inputs.iter().filter(|port| port.required) {
            let value = obj
                .get(&port.name)
                .ok_or_else(|| ToolCrewError::InvalidArgument {
                    name: port.name.clone(),
                    reason: format!("required by `{}`", self.name),
                })?;
            let expected = port
                .schema
                .as_ref()
                .and_then(|schema| schema.type_name.as_deref());
            if expected == Some("string") && !value.is_string() {
                return Err(ToolCrewError::InvalidArgument {
                    name: port.name.clone(),
                    reason: format!("expected a string, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolPort {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<ToolPortSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl ToolPort {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            description: None,
            required: false,
        }
    }

    pub fn with_schema(mut self, schema: ToolPortSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolPortSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_schema: Option<Value>,
}

impl ToolPortSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_json_schema(mut self, schema: Value) -> Self {
        self.json_schema = Some(schema);
        self
    }
}

#[derive(Clone, Debug)]
pub struct ToolManifestBuilder {
    manifest: ToolManifest,
}

impl ToolManifestBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            manifest: ToolManifest {
                name: name.into(),
                description: None,
                inputs: Vec::new(),
                outputs: Vec::new(),
                permissions: Vec::new(),
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.manifest.description = Some(description.into());
        self
    }

    pub fn input(mut self, port: ToolPort) -> Self {
        self.manifest.inputs.push(port);
        self
    }

    pub fn output(mut self, port: ToolPort) -> Self {
        self.manifest.outputs.push(port);
        self
    }

    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.manifest.permissions.push(permission.into());
        self
    }

    pub fn build(self) -> ToolManifest {
        self.manifest
    }
}
