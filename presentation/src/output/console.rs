//! Console formatting for streamed replies

use aivy_application::{StreamError, TransportError};
use aivy_domain::ReplyOutcome;
use colored::Colorize;

/// Formats replies, errors and notices for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One-line error with a hint for the common failures
    pub fn format_error(error: &StreamError) -> String {
        let hint = match error {
            StreamError::Transport(TransportError::Connect(_)) => {
                Some("is the backend running? Try --base-url or [backend] base_url")
            }
            StreamError::Transport(TransportError::IdleTimeout(_)) => {
                Some("raise [stream] idle_timeout_seconds for slow models")
            }
            _ => None,
        };

        let mut output = format!("{} {}", "Error:".red().bold(), error);
        if let Some(hint) = hint {
            output.push_str(&format!("\n  {} {}", "hint:".dimmed(), hint));
        }
        output
    }

    /// The offline reply shown in place of a failed stream
    pub fn format_fallback(reply: &str) -> String {
        format!("{} {}", "(offline)".yellow(), reply)
    }

    /// Notice for a reply whose body ended without a done event
    pub fn format_truncated(outcome: &ReplyOutcome) -> String {
        format!(
            "{}",
            format!(
                "[reply ended without a done marker after {} tokens; it may be incomplete]",
                outcome.tokens
            )
            .dimmed()
        )
    }

    /// Format as JSON
    pub fn format_json(outcome: &ReplyOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Banner printed when chat mode starts
    pub fn format_welcome(conversation: &str) -> String {
        let line = "─".repeat(45);
        format!(
            "\n{}\n{:^45}\n{}\n\nConversation: {}\n\nCommands:\n  /help     - Show this help\n  /quit     - Exit chat\n",
            line.cyan(),
            "AIVY - Chat Mode".bold(),
            line.cyan(),
            conversation.yellow()
        )
    }
}
