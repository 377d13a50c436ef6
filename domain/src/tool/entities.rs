//! Tool catalogue entities: descriptors, argument schemas, and calls.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Declared type of a single argument field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    String,
    Integer,
    Number,
    Boolean,
}

/// One field of a tool's argument schema, in declaration order.
///
/// Order matters: the Schema Coercer zips positional (comma-split) input
/// against this list in declaration order, so `arg_schema` is modeled as a
/// `Vec`, not a map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgField {
    pub field_name: String,
    #[serde(rename = "type")]
    pub arg_type: ArgType,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ArgField {
    pub fn new(field_name: impl Into<String>, arg_type: ArgType, required: bool) -> Self {
        Self {
            field_name: field_name.into(),
            arg_type,
            required,
            default: None,
        }
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// A tool discovered from an MCP server, unique by name across the whole
/// catalogue. Populated once at subprocess-ready and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub server_id: String,
    pub description: String,
    pub arg_schema: Vec<ArgField>,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        server_id: impl Into<String>,
        description: impl Into<String>,
        arg_schema: Vec<ArgField>,
    ) -> Self {
        Self {
            name: name.into(),
            server_id: server_id.into(),
            description: description.into(),
            arg_schema,
        }
    }

    pub fn field(&self, name: &str) -> Option<&ArgField> {
        self.arg_schema.iter().find(|f| f.field_name == name)
    }
}

/// Name-indexed, first-registration-wins catalogue of tool descriptors.
///
/// Mirrors the teacher's `ToolSpec` registry shape, but keyed purely by name
/// (no per-tool risk tier — the host has exactly one provider kind: MCP
/// subprocess servers) and with an explicit collision-drop in `register`.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalogue {
    tools: HashMap<String, ToolDescriptor>,
}

impl ToolCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor. Returns `false` (and drops the new one) if a
    /// tool with the same name is already registered.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> bool {
        if self.tools.contains_key(&descriptor.name) {
            return false;
        }
        self.tools.insert(descriptor.name.clone(), descriptor);
        true
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Remove every descriptor owned by a given server (used when a
    /// subprocess is torn down and re-discovered).
    pub fn remove_server(&mut self, server_id: &str) {
        self.tools.retain(|_, d| d.server_id != server_id);
    }
}

/// A resolved, ready-to-dispatch tool invocation: a tool name plus a typed
/// argument bag produced by the Schema Coercer, with an optional advisory
/// server hint carried through from the classifier (never consulted for
/// dispatch — routing is name-based, see the Tool Registry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: HashMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_server: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>, arguments: HashMap<String, serde_json::Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            advisory_server: None,
        }
    }

    pub fn with_advisory_server(mut self, server_id: impl Into<String>) -> Self {
        self.advisory_server = Some(server_id.into());
        self
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather_tool() -> ToolDescriptor {
        ToolDescriptor::new(
            "get_weather",
            "weather-server",
            "Look up the weather for a city",
            vec![
                ArgField::new("location", ArgType::String, true),
                ArgField::new("days", ArgType::Integer, false).with_default(serde_json::json!(1)),
            ],
        )
    }

    #[test]
    fn catalogue_first_registration_wins() {
        let mut catalogue = ToolCatalogue::new();
        assert!(catalogue.register(weather_tool()));

        let duplicate = ToolDescriptor::new(
            "get_weather",
            "other-server",
            "A different weather tool",
            vec![],
        );
        assert!(!catalogue.register(duplicate));

        assert_eq!(
            catalogue.get("get_weather").unwrap().server_id,
            "weather-server"
        );
        assert_eq!(catalogue.len(), 1);
    }

    #[test]
    fn field_lookup_by_name() {
        let tool = weather_tool();
        assert_eq!(tool.field("location").unwrap().arg_type, ArgType::String);
        assert!(tool.field("nonexistent").is_none());
    }

    #[test]
    fn remove_server_drops_only_its_tools() {
        let mut catalogue = ToolCatalogue::new();
        catalogue.register(weather_tool());
        catalogue.register(ToolDescriptor::new("ping", "other-server", "Ping", vec![]));

        catalogue.remove_server("weather-server");

        assert!(!catalogue.contains("get_weather"));
        assert!(catalogue.contains("ping"));
    }
}
