use std::env;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logging setup shared by the binaries.
pub struct LoggingConfig;

impl LoggingConfig {
    /// Installs a stderr subscriber. Stdout is reserved for protocol
    /// frames and program output.
    ///
    /// - `RUST_LOG`: explicit filter (error, warn, info, debug, trace)
    /// - `TOOLCREW_DEBUG`: verbose output with targets, files and lines
    pub fn init() {
        let is_debug = Self::is_debug();

        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => {
                if is_debug {
                    EnvFilter::new("toolcrew=debug,info")
                } else {
                    EnvFilter::new("toolcrew=info,warn")
                }
            }
        };

        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(is_debug)
            .with_file(is_debug)
            .with_line_number(is_debug)
            .with_thread_ids(is_debug);

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();

        if is_debug {
            tracing::debug!("debug logging enabled");
        }
    }

    pub fn is_debug() -> bool {
        env::var("TOOLCREW_DEBUG").is_ok()
    }
}
