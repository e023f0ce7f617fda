use serde::{Deserialize, Serialize};

use super::env::EnvConfig;

pub const BRAVE_API_KEY: &str = "BRAVE_API_KEY";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_ORGANIZATION: &str = "OPENAI_ORGANIZATION";

/// Credential strings resolved once at startup.
///
/// Unset variables are kept as empty strings; whichever component actually
/// needs a credential decides whether an empty one is fatal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub brave_api_key: String,
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub openai_organization: String,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            brave_api_key: EnvConfig::get_env_or_empty(BRAVE_API_KEY),
            openai_api_key: EnvConfig::get_env_or_empty(OPENAI_API_KEY),
            openai_organization: EnvConfig::get_env_or_empty(OPENAI_ORGANIZATION),
        }
    }

    pub fn with_openai(mut self, api_key: impl Into<String>, organization: impl Into<String>) -> Self {
        self.openai_api_key = api_key.into();
        self.openai_organization = organization.into();
        self
    }

    pub fn with_brave(mut self, api_key: impl Into<String>) -> Self {
        self.brave_api_key = api_key.into();
        self
    }

    pub fn organization(&self) -> Option<&str> {
        Some(self.openai_organization.as_str()).filter(|org| !org.is_empty())
    }
}
