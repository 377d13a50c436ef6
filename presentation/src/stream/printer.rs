//! Renders a turn's [`StreamMessage`] events to the terminal, the demo
//! CLI's counterpart to the teacher's `ProgressReporter`/`ConsoleFormatter`
//! pair — one prints progress as it happens, the other renders a finished
//! result. Here both roles collapse onto the single event stream.

use colored::Colorize;
use mcphost_domain::StreamMessage;
use tokio::sync::mpsc::Receiver;

pub struct StreamPrinter {
    quiet: bool,
}

impl StreamPrinter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Drain `receiver` to completion, printing each event. Returns once the
    /// channel closes (the Stream Hub closed or displaced the connection).
    pub async fn drain(&self, mut receiver: Receiver<StreamMessage>) {
        while let Some(message) = receiver.recv().await {
            self.print(&message);
        }
    }

    fn print(&self, message: &StreamMessage) {
        match message {
            StreamMessage::SessionStart { .. } => {
                if !self.quiet {
                    println!("{}", "-- turn started --".dimmed());
                }
            }
            StreamMessage::Thinking { thought, .. } => {
                if !self.quiet && !thought.is_empty() {
                    println!("{} {}", "thinking:".cyan().bold(), thought);
                }
            }
            StreamMessage::Acting { tool_name, .. } => {
                if !self.quiet {
                    println!("{} {}", "acting:".yellow().bold(), tool_name);
                }
            }
            StreamMessage::Observing { observation, .. } => {
                if !self.quiet {
                    println!("{} {}", "observing:".yellow().bold(), observation);
                }
            }
            StreamMessage::ToolCall { tool_name, arguments, .. } => {
                if !self.quiet {
                    println!(
                        "{} {} {}",
                        "tool call:".yellow().bold(),
                        tool_name,
                        serde_json::to_string(arguments).unwrap_or_default()
                    );
                }
            }
            StreamMessage::PartialResponse { delta, .. } => {
                print!("{delta}");
            }
            StreamMessage::FinalResponse { text, .. } => {
                println!("{}\n{text}", "response:".green().bold());
            }
            StreamMessage::Error { message, .. } => {
                eprintln!("{} {message}", "error:".red().bold());
            }
            StreamMessage::SessionEnd { .. } => {
                if !self.quiet {
                    println!("{}", "-- turn ended --".dimmed());
                }
            }
        }
    }
}
