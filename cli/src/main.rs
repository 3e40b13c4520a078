//! CLI entrypoint for aivy
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use aivy_application::StreamReplyUseCase;
use aivy_domain::{ConversationId, DedupPolicy};
use aivy_infrastructure::{ConfigLoader, FileConfig, HttpChatTransport, JsonlStreamLogger};
use aivy_presentation::{ChatRepl, Cli, OutputConfig, ReplyPrinter, RequestTemplate};
use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut config, &cli);
    config.validate().context("Invalid configuration")?;

    info!("Starting aivy");

    // === Dependency Injection ===
    let transport_config = config.to_transport_config();
    let transport =
        HttpChatTransport::new(&transport_config).context("Failed to create HTTP client")?;
    info!("Streaming from {}", transport.endpoint());

    let mut use_case =
        StreamReplyUseCase::new(Arc::new(transport)).with_config(config.to_consumer_config());
    if let Some(path) = &config.logging.transcript {
        match JsonlStreamLogger::open(path) {
            Some(logger) => {
                info!("Writing stream transcript to {}", logger.path().display());
                use_case = use_case.with_stream_logger(Arc::new(logger));
            }
            None => warn!("Continuing without transcript"),
        }
    }

    let template = RequestTemplate::new(ConversationId::try_new(cli.conversation.as_str())?)
        .with_model(config.request.model.clone())
        .with_system_prompt(config.request.system_prompt.clone())
        .with_temperature(config.request.temperature);

    let printer = ReplyPrinter::new(
        OutputConfig {
            format: cli.output,
            show_progress: !cli.quiet,
            fallback: !cli.no_fallback,
        },
        transport_config.endpoint(),
    );

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        }
    });

    // Chat mode
    if cli.chat {
        ChatRepl::new(use_case, template, printer)
            .run(shutdown)
            .await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single message mode - message is required
    let message = match cli.message {
        Some(m) => m,
        None => bail!("Message is required. Use --chat for interactive mode."),
    };
    let request = template.request(&message)?;

    match printer.print(&use_case, request, shutdown).await {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_aborted() => Ok(ExitCode::from(130)),
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

/// Initialize logging based on verbosity level.
///
/// With `log_file`, logs go through a non-blocking file writer whose guard
/// must live until exit.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}

/// CLI flags take precedence over every configuration source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    if let Some(dedup) = cli.dedup {
        config.stream.dedup = DedupPolicy::from(dedup);
    }
    if let Some(model) = &cli.model {
        config.request.model = Some(model.clone());
    }
    if let Some(transcript) = &cli.transcript {
        config.logging.transcript = Some(transcript.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from([
            "aivy",
            "--base-url",
            "http://10.1.1.1:8000",
            "--dedup",
            "overlap-merge",
            "-m",
            "phi3",
            "hi",
        ])
        .unwrap();
        let mut config = FileConfig::default();
        config.request.model = Some("from-file".to_string());

        apply_cli_overrides(&mut config, &cli);
        assert_eq!(config.backend.base_url, "http://10.1.1.1:8000");
        assert_eq!(config.stream.dedup, DedupPolicy::OverlapMerge);
        assert_eq!(config.request.model.as_deref(), Some("phi3"));
        assert!(config.logging.transcript.is_none());
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = Cli::try_parse_from(["aivy", "hi"]).unwrap();
        let mut config = FileConfig::default();
        config.backend.base_url = "https://aivy.example.com".to_string();

        apply_cli_overrides(&mut config, &cli);
        assert_eq!(config.backend.base_url, "https://aivy.example.com");
        assert_eq!(config.stream.dedup, DedupPolicy::ExactRepeat);
    }
}
