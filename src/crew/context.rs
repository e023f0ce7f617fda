use std::collections::BTreeMap;

use serde_json::Value;

/// Artifacts produced so far in a crew run, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct TaskContext {
    artifacts: BTreeMap<String, String>,
}

impl TaskContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.artifacts.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.artifacts.get(name).map(String::as_str)
    }

    pub fn artifacts(&self) -> &BTreeMap<String, String> {
        &self.artifacts
    }

    /// Replaces `{{name}}` in every string of `value`. Unknown names are
    /// left untouched.
    pub fn render(&self, value: &Value) -> Value {
        match value {
            Value::String(text) => Value::String(self.render_str(text)),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.render(item)).collect()),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.render(item)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn render_str(&self, text: &str) -> String {
        let mut rendered = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find("{{") {
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                break;
            };
            rendered.push_str(&rest[..start]);
            match self.get(after[..end].trim()) {
                Some(value) => rendered.push_str(value),
                None => rendered.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }
        rendered.push_str(rest);
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_substitutes_known_artifacts() {
        let mut ctx = TaskContext::new();
        ctx.insert("research", "MCP links hosts to tool servers");
        let rendered = ctx.render(&json!({
            "content": "Summary: {{research}} / {{ research }} / {{missing}}",
            "count": 3
        }));
        assert_eq!(
            rendered,
            json!({
                "content": "Summary: MCP links hosts to tool servers / MCP links hosts to tool servers / {{missing}}",
                "count": 3
            })
        );
    }
}
