//! Interactive chat module.
//!
//! Provides a readline-based interactive chat interface for the host.

mod repl;

pub use repl::ChatRepl;
