//! Presentation layer for the MCP host.
//!
//! CLI argument definitions, the interactive chat REPL, and a renderer for
//! the Stream Hub's typed progress events.

pub mod chat;
pub mod cli;
pub mod stream;

pub use chat::ChatRepl;
pub use cli::commands::Cli;
pub use stream::StreamPrinter;
