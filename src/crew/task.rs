use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One tool call a task makes. String arguments may reference artifacts
/// with `{{name}}` placeholders.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TaskStep {
    pub server: String,
    pub tool: String,
    #[serde(default)]
    pub arguments: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produces: Option<String>,
}

impl TaskStep {
    pub fn new(server: impl Into<String>, tool: impl Into<String>, arguments: Value) -> Self {
        Self {
            server: server.into(),
            tool: tool.into(),
            arguments,
            produces: None,
        }
    }

    pub fn produces(mut self, artifact: impl Into<String>) -> Self {
        self.produces = Some(artifact.into());
        self
    }

    /// Artifact names referenced by placeholders in the arguments.
    pub fn references(&self) -> Vec<String> {
        let mut found = Vec::new();
        collect_references(&self.arguments, &mut found);
        found
    }
}

/// An ordered unit of work assigned to one agent.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TaskSpec {
    pub name: String,
    pub description: String,
    pub expected_output: String,
    /// Role of the assigned agent.
    pub agent: String,
    #[serde(default)]
    pub steps: Vec<TaskStep>,
    /// Artifacts that must come from earlier tasks.
    #[serde(default)]
    pub consumes: Vec<String>,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            expected_output: String::new(),
            agent: agent.into(),
            steps: Vec::new(),
            consumes: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_expected_output(mut self, expected_output: impl Into<String>) -> Self {
        self.expected_output = expected_output.into();
        self
    }

    pub fn step(mut self, step: TaskStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn consumes(mut self, artifact: impl Into<String>) -> Self {
        self.consumes.push(artifact.into());
        self
    }

    pub fn produces(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|step| step.produces.as_deref())
            .collect()
    }
}

/// Result of running one task.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskOutput {
    pub task: String,
    pub agent: String,
    pub raw: String,
    #[serde(default)]
    pub artifacts: BTreeMap<String, String>,
}

pub(crate) fn placeholders(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            break;
        };
        let name = after[..end].trim();
        if !name.is_empty() {
            names.push(name);
        }
        rest = &after[end + 2..];
    }
    names
}

fn collect_references(value: &Value, found: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            for name in placeholders(text) {
                if !found.iter().any(|existing| existing == name) {
                    found.push(name.to_string());
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_references(item, found)),
        Value::Object(map) => map.values().for_each(|item| collect_references(item, found)),
        _ => {}
    }
}
