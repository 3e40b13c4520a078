//! CLI command definitions

use aivy_domain::DedupPolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// How a reply is written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Stream tokens as they arrive
    #[default]
    Text,
    /// Print the finished reply as one JSON object
    Json,
}

/// Token de-duplication policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DedupArg {
    /// Drop a token identical to the previous one
    ExactRepeat,
    /// Drop the part of a token that repeats the end of the reply
    OverlapMerge,
}

impl From<DedupArg> for DedupPolicy {
    fn from(arg: DedupArg) -> Self {
        match arg {
            DedupArg::ExactRepeat => DedupPolicy::ExactRepeat,
            DedupArg::OverlapMerge => DedupPolicy::OverlapMerge,
        }
    }
}

/// CLI arguments for aivy
#[derive(Parser, Debug)]
#[command(name = "aivy")]
#[command(author, version, about = "Stream chat replies from the AIVY backend")]
#[command(long_about = r#"
aivy sends a message to the AIVY chat backend and prints the reply token by
token as it streams in.

In chat mode every line you type is sent to the same conversation. Sending a
new line while a reply is still streaming cancels that reply.

Configuration files are loaded from (in priority order):
1. AIVY_* environment variables (AIVY_BACKEND__BASE_URL=...)
2. --config <path>     Explicit config file
3. ./aivy.toml         Project-level config
4. ~/.config/aivy/config.toml   Global config

Example:
  aivy -c study-1 "Explain photosynthesis in one paragraph"
  aivy -c study-1 --chat
  aivy --base-url http://localhost:9000 --dedup overlap-merge "hello"
"#)]
pub struct Cli {
    /// The message to send (not required in chat mode)
    pub message: Option<String>,

    /// Conversation the message belongs to
    #[arg(short = 'c', long, value_name = "ID", default_value = "default")]
    pub conversation: String,

    /// Start interactive chat mode
    #[arg(long)]
    pub chat: bool,

    /// Backend base URL (overrides config)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Token de-duplication policy (overrides config)
    #[arg(long, value_enum)]
    pub dedup: Option<DedupArg>,

    /// Model requested from the backend (overrides config)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append a JSONL transcript of stream events to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Do not print the offline reply when streaming fails
    #[arg(long)]
    pub no_fallback: bool,
}
