//! Infrastructure layer for aivy
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod http;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileBackendConfig, FileConfig, FileLoggingConfig,
    FileRequestConfig, FileStreamConfig,
};
pub use http::{HttpChatTransport, HttpTransportConfig};
pub use logging::JsonlStreamLogger;
