//! CLI entrypoint for the MCP host.
//!
//! Wires together all layers using dependency injection: load config and
//! server inventory, spawn MCP subprocess clients, construct the session
//! store / stream hub / demo LLM gateway, then either answer one message or
//! drop into the interactive REPL.

use anyhow::{bail, Context, Result};
use clap::Parser;
use mcphost_application::{StreamHubPort, WorkflowExecutor};
use mcphost_infrastructure::{ConfigLoader, DemoLlmGateway, InMemorySessionStore, McpToolRegistry, ServerInventory, StreamHub};
use mcphost_presentation::{ChatRepl, Cli, StreamPrinter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("starting mcphost");

    let config = ConfigLoader::load(cli.config.as_ref()).context("loading host config")?;

    let inventory_path: PathBuf = cli
        .inventory
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.inventory_path));
    let inventory = ServerInventory::load(&inventory_path)
        .with_context(|| format!("loading server inventory from {}", inventory_path.display()))?;

    if inventory.is_empty() {
        bail!("server inventory at {} has no entries", inventory_path.display());
    }

    info!("mcp: spawning {} server(s)", inventory.len());
    let registry = Arc::new(
        McpToolRegistry::initialize(&inventory)
            .await
            .context("initializing MCP tool registry")?,
    );

    let sessions = InMemorySessionStore::start(
        Duration::from_secs(config.cleanup_interval_minutes as u64 * 60),
        config.idle_timeout_minutes,
    );
    let hub = StreamHub::start_default();
    let gateway = Arc::new(DemoLlmGateway::new());

    let executor = Arc::new(WorkflowExecutor::new(
        gateway,
        registry,
        sessions,
        hub.clone(),
        config.llm.model.clone(),
        config.llm.model.clone(),
        config.llm.model.clone(),
    ));

    let session_id = cli
        .session
        .clone()
        .unwrap_or_else(|| "default-session".to_string());

    match cli.message {
        Some(message) => {
            let (connection_id, receiver) = hub.open_with_receiver(&session_id).await?;
            let printer = StreamPrinter::new(cli.quiet);
            let drain = tokio::spawn(async move {
                printer.drain(receiver).await;
            });

            let turn = executor.execute(&session_id, &message).await;
            hub.close(&connection_id).await;
            let _ = drain.await;

            if !turn.success {
                if let Some(error) = &turn.error {
                    bail!("turn failed: {error}");
                }
            }
            Ok(())
        }
        None => {
            let repl = ChatRepl::new(executor, session_id);
            repl.run().await.map_err(|e| anyhow::anyhow!(e.to_string()))
        }
    }
}
