//! Configuration file loading for aivy
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AIVY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./aivy.toml` or `./.aivy.toml`
//! 4. Global: `$XDG_CONFIG_HOME/aivy/config.toml` or `~/.config/aivy/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_BASE_URL, DEFAULT_STREAM_PATH, FileBackendConfig, FileConfig,
    FileLoggingConfig, FileRequestConfig, FileStreamConfig,
};
pub use loader::ConfigLoader;
