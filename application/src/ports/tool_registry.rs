//! Tool Registry port.
//!
//! The aggregated view of every MCP server's tool catalogue, plus dispatch.
//! Implementations (adapters) live in the infrastructure layer and own the
//! MCP subprocess clients.

use async_trait::async_trait;
use mcphost_domain::{HostError, ToolCallRecord, ToolDescriptor};

#[async_trait]
pub trait ToolRegistryPort: Send + Sync {
    /// Snapshot of every tool currently registered, across all servers.
    fn catalogue(&self) -> Vec<ToolDescriptor>;

    /// Look up one tool's descriptor by name.
    fn describe(&self, tool_name: &str) -> Option<ToolDescriptor>;

    /// The ids of servers currently reachable (subprocess alive).
    fn server_ids(&self) -> Vec<String>;

    /// Dispatch a coerced tool call to its owning server and await the
    /// result. The advisory server on `tool_name`'s descriptor, if any, is
    /// not consulted — dispatch is by tool name alone.
    async fn call(
        &self,
        tool_name: &str,
        arguments: std::collections::HashMap<String, serde_json::Value>,
    ) -> Result<ToolCallRecord, HostError>;
}
