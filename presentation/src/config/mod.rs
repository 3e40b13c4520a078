//! Presentation-level configuration
//!
//! Configuration for reply output and REPL behavior.

use crate::cli::commands::OutputFormat;

/// Output configuration for the presentation layer
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// How replies are written to stdout
    pub format: OutputFormat,
    /// Show the connect spinner
    pub show_progress: bool,
    /// Print the offline reply when a stream fails
    pub fallback: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_progress: true,
            fallback: true,
        }
    }
}
