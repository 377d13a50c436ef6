//! REPL (Read-Eval-Print Loop) for interactive chat against the host.
//!
//! Prints each turn's finished response, the same "call the use case, render
//! the result" shape as the teacher's `ChatRepl` — the Stream Hub's
//! per-event push model is for external subscribers (§4.8), not this
//! terminal's own prompt loop.

use mcphost_application::ports::llm_gateway::LlmGateway;
use mcphost_application::use_cases::workflow::WorkflowExecutor;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::sync::Arc;

/// Interactive chat REPL driving one `WorkflowExecutor` across many turns.
pub struct ChatRepl<G: LlmGateway + 'static> {
    executor: Arc<WorkflowExecutor<G>>,
    session_id: String,
}

impl<G: LlmGateway + 'static> ChatRepl<G> {
    pub fn new(executor: Arc<WorkflowExecutor<G>>, session_id: impl Into<String>) -> Self {
        Self {
            executor,
            session_id: session_id.into(),
        }
    }

    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("mcphost").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(">>> ");

            match readline {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_message(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err:?}");
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              MCP Host - Chat Mode            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Session: {}", self.session_id);
        println!();
        println!("Commands:");
        println!("  /help   - Show this help");
        println!("  /quit   - Exit chat");
        println!();
    }

    fn handle_command(&self, cmd: &str) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_message(&self, message: &str) {
        println!();
        let turn = self.executor.execute(&self.session_id, message).await;
        if turn.success {
            println!("{}", turn.response);
        } else if let Some(error) = &turn.error {
            eprintln!("error: {error}");
        }
        println!();
    }
}
