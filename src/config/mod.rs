pub mod credentials;
pub mod env;
pub mod image;

pub use credentials::Credentials;
pub use env::EnvConfig;
pub use image::ImageServerConfig;
