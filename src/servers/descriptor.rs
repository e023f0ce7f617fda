use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How to launch one external tool server over stdio.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolServerDescriptor {
    pub name: String,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Builds a descriptor without checking that `command` exists; a missing
/// executable only shows up when a client tries to spawn it.
pub fn build_descriptor<N, C, A, K, V>(
    name: N,
    command: C,
    args: impl IntoIterator<Item = A>,
    env: impl IntoIterator<Item = (K, V)>,
) -> ToolServerDescriptor
where
    N: Into<String>,
    C: Into<String>,
    A: Into<String>,
    K: Into<String>,
    V: Into<String>,
{
    ToolServerDescriptor {
        name: name.into(),
        command: command.into(),
        args: args.into_iter().map(Into::into).collect(),
        env: env
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect(),
    }
}

impl ToolServerDescriptor {
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }
}

impl fmt::Display for ToolServerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.name, self.command)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        write!(f, ")")?;
        if !self.env.is_empty() {
            let rendered: Vec<String> = self
                .env
                .iter()
                .map(|(key, value)| {
                    let state = if value.is_empty() { "<unset>" } else { "<set>" };
                    format!("{key}={state}")
                })
                .collect();
            write!(f, " env[{}]", rendered.join(", "))?;
        }
        Ok(())
    }
}
