//! MCP subprocess client layer.
//!
//! Each entry in the server inventory becomes a child process speaking
//! newline-delimited JSON-RPC 2.0 over stdio (§6, §4.1). [`registry::McpToolRegistry`]
//! is the `ToolRegistryPort` adapter: it spawns one [`client::McpClient`] per
//! server, aggregates their tool catalogues, and dispatches calls by tool
//! name.

pub mod client;
pub mod protocol;
pub mod registry;
pub mod transport;

pub use client::McpClient;
pub use registry::McpToolRegistry;
