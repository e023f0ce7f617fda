use std::path::Path;

use crate::config::credentials::{
    Credentials, BRAVE_API_KEY, OPENAI_API_KEY, OPENAI_ORGANIZATION,
};

use super::descriptor::{build_descriptor, ToolServerDescriptor};

pub const FILESYSTEM_SERVER: &str = "filesystem";
pub const BRAVE_SEARCH_SERVER: &str = "brave_search";
pub const IMAGE_SERVER: &str = "image";

pub const FILESYSTEM_PACKAGE: &str = "@modelcontextprotocol/server-filesystem";
pub const BRAVE_SEARCH_PACKAGE: &str = "@modelcontextprotocol/server-brave-search";

pub fn filesystem_server(allowed_dir: &Path) -> ToolServerDescriptor {
    build_descriptor(
        FILESYSTEM_SERVER,
        "npx",
        [
            "-y".to_string(),
            FILESYSTEM_PACKAGE.to_string(),
            allowed_dir.display().to_string(),
        ],
        std::iter::empty::<(String, String)>(),
    )
}

pub fn brave_search_server(credentials: &Credentials) -> ToolServerDescriptor {
    build_descriptor(
        BRAVE_SEARCH_SERVER,
        "npx",
        ["-y", BRAVE_SEARCH_PACKAGE],
        [(BRAVE_API_KEY, credentials.brave_api_key.as_str())],
    )
}

/// `command` is the path of the `image-server` binary.
pub fn image_server(command: &str, credentials: &Credentials) -> ToolServerDescriptor {
    build_descriptor(
        IMAGE_SERVER,
        command,
        std::iter::empty::<String>(),
        [
            (OPENAI_API_KEY, credentials.openai_api_key.as_str()),
            (OPENAI_ORGANIZATION, credentials.openai_organization.as_str()),
        ],
    )
}

/// The three servers the demo crew talks to, in launch order.
pub fn default_descriptors(
    allowed_dir: &Path,
    image_server_command: &str,
    credentials: &Credentials,
) -> Vec<ToolServerDescriptor> {
    vec![
        filesystem_server(allowed_dir),
        brave_search_server(credentials),
        image_server(image_server_command, credentials),
    ]
}
