use std::env;

/// Environment variable lookups shared by both binaries.
pub struct EnvConfig;

impl EnvConfig {
    /// Reads `key`, treating an empty value as unset.
    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|value| !value.is_empty())
    }

    /// Reads `key`, yielding an empty string when it is unset.
    pub fn get_env_or_empty(key: &str) -> String {
        env::var(key).unwrap_or_default()
    }
}
