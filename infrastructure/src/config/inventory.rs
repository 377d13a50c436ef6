//! Server-inventory loader (§6): a fail-fast `serde_json` deserialization of
//! the on-disk tool-server descriptor, no different in kind from the
//! teacher's figment-based `FileConfig` loading — just JSON instead of TOML,
//! and no layering, since the inventory is a single authored file rather
//! than a merged multi-source config.

use mcphost_domain::HostError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One server-inventory entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerEntry {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Either top-level shape from §6: `{servers: {id -> entry}}` or
/// `{id -> entry}` directly.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InventoryDocument {
    Wrapped { servers: HashMap<String, ServerEntry> },
    Bare(HashMap<String, ServerEntry>),
}

/// A validated server inventory: every entry has a non-empty `command`.
#[derive(Debug, Clone, Default)]
pub struct ServerInventory {
    servers: HashMap<String, ServerEntry>,
}

impl ServerInventory {
    pub fn load(path: &Path) -> Result<Self, HostError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| HostError::ConfigInvalid(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, HostError> {
        let document: InventoryDocument = serde_json::from_str(text)
            .map_err(|e| HostError::ConfigInvalid(format!("malformed server inventory: {e}")))?;

        let servers = match document {
            InventoryDocument::Wrapped { servers } => servers,
            InventoryDocument::Bare(servers) => servers,
        };

        for (id, entry) in &servers {
            if entry.command.trim().is_empty() {
                return Err(HostError::ConfigInvalid(format!(
                    "server '{id}' has an empty command"
                )));
            }
        }

        Ok(Self { servers })
    }

    pub fn servers(&self) -> impl Iterator<Item = (&String, &ServerEntry)> {
        self.servers.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wrapped_shape() {
        let json = r#"{"servers": {"weather": {"command": "weather-mcp", "args": ["--demo"]}}}"#;
        let inventory = ServerInventory::parse(json).unwrap();
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn parses_bare_shape() {
        let json = r#"{"weather": {"command": "weather-mcp"}}"#;
        let inventory = ServerInventory::parse(json).unwrap();
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn rejects_empty_command() {
        let json = r#"{"servers": {"weather": {"command": ""}}}"#;
        assert!(ServerInventory::parse(json).is_err());
    }
}
