pub mod descriptor;
pub mod presets;

pub use descriptor::{build_descriptor, ToolServerDescriptor};
pub use presets::{
    brave_search_server, default_descriptors, filesystem_server, image_server,
    BRAVE_SEARCH_SERVER, FILESYSTEM_SERVER, IMAGE_SERVER,
};
