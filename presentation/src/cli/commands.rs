//! CLI command definitions.

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the MCP host.
#[derive(Parser, Debug)]
#[command(name = "mcphost")]
#[command(author, version, about = "Host and dispatch tools over MCP subprocess servers")]
#[command(long_about = r#"
mcphost loads a server inventory, spawns each server as an MCP subprocess,
classifies an incoming message's intent, and dispatches it through a single
tool call, a ReAct think/act/observe loop, or a direct chat reply.

Example:
  mcphost "what's the weather in Lisbon?"
  mcphost --inventory ./mcp_servers.json --session demo-session
  mcphost (with no message) starts an interactive REPL
"#)]
pub struct Cli {
    /// The message to send. If omitted, starts an interactive REPL.
    pub message: Option<String>,

    /// Session id to use (a fresh one is created if omitted).
    #[arg(long, value_name = "SESSION_ID")]
    pub session: Option<String>,

    /// Path to the host TOML config file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the server-inventory JSON file (overrides the config value).
    #[arg(long, value_name = "PATH")]
    pub inventory: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress stream progress events, print only the final response.
    #[arg(short, long)]
    pub quiet: bool,
}
