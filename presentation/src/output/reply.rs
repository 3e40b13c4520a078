//! Streams one reply to the console.

use super::console::ConsoleFormatter;
use super::fallback::fallback_reply;
use super::token_writer::TokenWriter;
use crate::cli::commands::OutputFormat;
use crate::config::OutputConfig;
use crate::progress::spinner::ConnectSpinner;
use aivy_application::{ReplyReader, StreamError, StreamReplyUseCase};
use aivy_domain::{ReplyOutcome, StreamRequest};
use std::io::{self, Write};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Prints streamed replies to stdout and failures to stderr.
#[derive(Debug, Clone)]
pub struct ReplyPrinter {
    config: OutputConfig,
    endpoint: String,
}

impl ReplyPrinter {
    pub fn new(config: OutputConfig, endpoint: impl Into<String>) -> Self {
        Self {
            config,
            endpoint: endpoint.into(),
        }
    }

    /// Stream the reply to `request`, writing tokens as they arrive.
    pub async fn print(
        &self,
        use_case: &StreamReplyUseCase,
        request: StreamRequest,
        cancel: CancellationToken,
    ) -> Result<ReplyOutcome, StreamError> {
        self.print_reader(use_case.open_reader(request, cancel)).await
    }

    /// Stream an already registered reply to the console.
    ///
    /// An aborted stream prints nothing further. Any other failure prints
    /// the error and, unless disabled, the offline reply.
    pub async fn print_reader(&self, reader: ReplyReader) -> Result<ReplyOutcome, StreamError> {
        let message = reader.request().message().to_string();
        let spinner = if self.config.show_progress {
            ConnectSpinner::start(&self.endpoint)
        } else {
            ConnectSpinner::hidden()
        };
        let streaming = self.config.format == OutputFormat::Text;
        let mut writer = TokenWriter::stdout();

        let result = reader
            .run(|token| {
                spinner.clear();
                if streaming && let Err(e) = writer.write_token(token) {
                    debug!("Could not write token to stdout: {}", e);
                }
            })
            .await;
        spinner.clear();

        if let Err(e) = self.report(&message, &result, &mut writer, &mut io::stderr()) {
            debug!("Could not write reply summary: {}", e);
        }
        result
    }

    /// Write what follows the streamed tokens.
    pub fn report<W: Write, E: Write>(
        &self,
        message: &str,
        result: &Result<ReplyOutcome, StreamError>,
        out: &mut TokenWriter<W>,
        err: &mut E,
    ) -> io::Result<()> {
        match result {
            Ok(outcome) => match self.config.format {
                OutputFormat::Text => {
                    out.finish_line()?;
                    if !outcome.terminated_by_done() {
                        writeln!(err, "{}", ConsoleFormatter::format_truncated(outcome))?;
                    }
                }
                OutputFormat::Json => {
                    out.write_token(&ConsoleFormatter::format_json(outcome))?;
                    out.finish_line()?;
                }
            },
            Err(e) if e.is_aborted() => out.finish_line()?,
            Err(e) => {
                out.finish_line()?;
                writeln!(err, "{}", ConsoleFormatter::format_error(e))?;
                if self.config.fallback {
                    out.write_token(&ConsoleFormatter::format_fallback(fallback_reply(message)))?;
                    out.finish_line()?;
                }
            }
        }
        Ok(())
    }
}
