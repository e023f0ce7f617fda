use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::credentials::Credentials;
use super::env::EnvConfig;

pub const DEFAULT_OUTPUT_DIR: &str = "images";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
pub const DEFAULT_IMAGE_QUALITY: &str = "hd";

/// Settings for the image tool server process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageServerConfig {
    pub output_dir: PathBuf,
    pub base_url: String,
    pub model: String,
    pub size: String,
    pub quality: String,
    pub credentials: Credentials,
}

impl Default for ImageServerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            size: DEFAULT_IMAGE_SIZE.to_string(),
            quality: DEFAULT_IMAGE_QUALITY.to_string(),
            credentials: Credentials::default(),
        }
    }
}

impl ImageServerConfig {
    /// `IMAGE_OUTPUT_DIR` and `OPENAI_BASE_URL` override the defaults.
    pub fn from_env() -> Self {
        let mut config = Self {
            credentials: Credentials::from_env(),
            ..Self::default()
        };
        if let Some(dir) = EnvConfig::get_env_optional("IMAGE_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(base_url) = EnvConfig::get_env_optional("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        config
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}
