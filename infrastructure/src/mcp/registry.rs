//! `ToolRegistryPort` adapter: aggregates one `McpClient` per inventory
//! entry into a flat, name-indexed catalogue and dispatches by tool name
//! only (§4.1 — the advisory `server_id` a caller may supply is never
//! consulted for routing).

use super::client::McpClient;
use crate::config::inventory::ServerInventory;
use async_trait::async_trait;
use mcphost_application::ports::tool_registry::ToolRegistryPort;
use mcphost_domain::tool::call_record::{ToolCallError, ToolCallErrorKind};
use mcphost_domain::{HostError, ToolCallRecord, ToolCatalogue, ToolDescriptor};
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct McpToolRegistry {
    clients: HashMap<String, McpClient>,
    catalogue: RwLock<ToolCatalogue>,
}

impl McpToolRegistry {
    /// Spawn every inventory entry and build the aggregated catalogue.
    /// Idempotent in spirit (§4.1) — calling it again on a fresh instance
    /// just re-spawns everything; the registry itself holds no mutable
    /// respawn state since a dead subprocess is surfaced as `SubprocessDown`
    /// rather than silently restarted.
    pub async fn initialize(inventory: &ServerInventory) -> Result<Self, HostError> {
        let mut clients = HashMap::new();
        let mut catalogue = ToolCatalogue::new();

        for (server_id, entry) in inventory.servers() {
            let client = McpClient::connect(
                server_id,
                &entry.command,
                &entry.args,
                &entry.env,
                entry.cwd.as_deref(),
            )
            .await?;

            for descriptor in client.tools() {
                if !catalogue.register(descriptor.clone()) {
                    warn!(
                        "tool name collision: '{}' from server '{}' dropped (already owned by \
                         another server)",
                        descriptor.name, server_id
                    );
                }
            }

            info!("mcp registry: server '{}' ready", server_id);
            clients.insert(server_id.clone(), client);
        }

        Ok(Self {
            clients,
            catalogue: RwLock::new(catalogue),
        })
    }
}

#[async_trait]
impl ToolRegistryPort for McpToolRegistry {
    fn catalogue(&self) -> Vec<ToolDescriptor> {
        self.catalogue
            .try_read()
            .map(|c| c.all().cloned().collect())
            .unwrap_or_default()
    }

    fn describe(&self, tool_name: &str) -> Option<ToolDescriptor> {
        self.catalogue.try_read().ok()?.get(tool_name).cloned()
    }

    fn server_ids(&self) -> Vec<String> {
        self.clients.keys().cloned().collect()
    }

    async fn call(
        &self,
        tool_name: &str,
        arguments: HashMap<String, serde_json::Value>,
    ) -> Result<ToolCallRecord, HostError> {
        let descriptor = {
            let catalogue = self.catalogue.read().await;
            catalogue.get(tool_name).cloned()
        };

        let Some(descriptor) = descriptor else {
            return Ok(ToolCallRecord::failure(
                String::new(),
                tool_name,
                arguments,
                ToolCallError::new(ToolCallErrorKind::NotFound, "no server owns this tool"),
                0,
                String::new(),
                None,
            ));
        };

        let Some(client) = self.clients.get(&descriptor.server_id) else {
            return Ok(ToolCallRecord::failure(
                descriptor.server_id.clone(),
                tool_name,
                arguments,
                ToolCallError::new(ToolCallErrorKind::SubprocessDown, "server has no live client"),
                0,
                String::new(),
                None,
            ));
        };

        if !client.is_alive().await {
            return Ok(ToolCallRecord::failure(
                descriptor.server_id.clone(),
                tool_name,
                arguments,
                ToolCallError::new(ToolCallErrorKind::SubprocessDown, "subprocess has exited"),
                0,
                String::new(),
                None,
            ));
        }

        let args_value = serde_json::Value::Object(
            arguments
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );

        let started = Instant::now();
        match client.call(tool_name, &descriptor.server_id, &args_value).await {
            Ok((result, request_text, response_text)) => Ok(ToolCallRecord::success(
                descriptor.server_id.clone(),
                tool_name,
                arguments,
                result,
                started.elapsed().as_millis() as u64,
                request_text,
                response_text,
            )),
            Err(HostError::ToolTimeout { .. }) => Ok(ToolCallRecord::failure(
                descriptor.server_id.clone(),
                tool_name,
                arguments,
                ToolCallError::new(ToolCallErrorKind::Timeout, "tool call timed out"),
                started.elapsed().as_millis() as u64,
                String::new(),
                None,
            )),
            Err(err) => Ok(ToolCallRecord::failure(
                descriptor.server_id.clone(),
                tool_name,
                arguments,
                ToolCallError::new(ToolCallErrorKind::ExecutionError, err.to_string()),
                started.elapsed().as_millis() as u64,
                String::new(),
                None,
            )),
        }
    }
}
