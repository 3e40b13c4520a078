//! REPL (Read-Eval-Print Loop) for interactive chat
//!
//! Every line is sent to the same conversation. Replies stream in a
//! background task so input stays responsive: a line typed while a reply
//! is still streaming supersedes it. Each reply registers before its task
//! is spawned, so replies supersede each other in input order.

use super::template::RequestTemplate;
use crate::output::console::ConsoleFormatter;
use crate::output::reply::ReplyPrinter;
use aivy_application::{ReplyReader, StreamReplyUseCase};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What the loop should do with one input line
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Skip,
    Quit,
    Help,
    Cancel,
    Unknown(&'a str),
    Message(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Skip;
    }
    if !line.starts_with('/') {
        return Input::Message(line);
    }
    match line {
        "/quit" | "/exit" | "/q" => Input::Quit,
        "/help" | "/h" | "/?" => Input::Help,
        "/cancel" | "/stop" => Input::Cancel,
        other => Input::Unknown(other),
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: StreamReplyUseCase,
    template: RequestTemplate,
    printer: ReplyPrinter,
}

impl ChatRepl {
    pub fn new(use_case: StreamReplyUseCase, template: RequestTemplate, printer: ReplyPrinter) -> Self {
        Self {
            use_case,
            template,
            printer,
        }
    }

    /// Run until `/quit`, end of input, or `shutdown`.
    ///
    /// At end of input the reply in flight is allowed to finish. `/quit`
    /// and `shutdown` cancel it.
    pub async fn run(&self, shutdown: CancellationToken) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut in_flight: Option<JoinHandle<()>> = None;

        println!(
            "{}",
            ConsoleFormatter::format_welcome(self.template.conversation_id().as_str())
        );

        loop {
            let line = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    println!("^C");
                    break;
                }
                line = lines.next_line() => line?,
            };

            let Some(line) = line else {
                if let Some(task) = in_flight.take() {
                    let _ = task.await;
                }
                println!("Bye!");
                return Ok(());
            };

            match classify(&line) {
                Input::Skip => {}
                Input::Quit => {
                    println!("Bye!");
                    break;
                }
                Input::Help => self.print_help(),
                Input::Cancel => {
                    if !self.use_case.cancel(self.template.conversation_id()) {
                        println!("Nothing to cancel");
                    }
                }
                Input::Unknown(cmd) => {
                    println!("Unknown command: {}", cmd);
                    println!("Type /help for available commands");
                }
                Input::Message(message) => match self.template.request(message) {
                    Ok(request) => {
                        let reader = self.use_case.open_reader(request, shutdown.child_token());
                        in_flight = Some(self.spawn_reply(reader));
                    }
                    Err(e) => eprintln!("{}", e),
                },
            }
        }

        self.use_case.cancel(self.template.conversation_id());
        if let Some(task) = in_flight.take() {
            let _ = task.await;
        }
        Ok(())
    }

    fn spawn_reply(&self, reader: ReplyReader) -> JoinHandle<()> {
        let printer = self.printer.clone();
        tokio::spawn(async move {
            if let Err(e) = printer.print_reader(reader).await {
                debug!("Chat reply ended: {}", e);
            }
        })
    }

    fn print_help(&self) {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?      - Show this help");
        println!("  /cancel, /stop     - Stop the reply being streamed");
        println!("  /quit, /exit, /q   - Exit chat");
        println!();
        println!("Sending a message while a reply streams replaces that reply.");
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("   "), Input::Skip);
        assert_eq!(classify("/quit"), Input::Quit);
        assert_eq!(classify(" /q "), Input::Quit);
        assert_eq!(classify("/?"), Input::Help);
        assert_eq!(classify("/stop"), Input::Cancel);
        assert_eq!(classify("/dance"), Input::Unknown("/dance"));
        assert_eq!(classify("  what is DNA?  "), Input::Message("what is DNA?"));
    }
}
