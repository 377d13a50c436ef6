//! Infrastructure layer for the MCP host.
//!
//! Adapters that implement the ports defined in the application layer:
//! MCP subprocess clients, configuration loading, the in-memory session
//! store, the stream hub, and a demo LLM gateway standing in for the
//! out-of-scope real provider binding.

pub mod config;
pub mod demo_llm;
pub mod mcp;
pub mod session;
pub mod stream;

pub use config::{ConfigLoader, ConfigValidationError, FileConfig, FileLlmConfig, ServerEntry, ServerInventory};
pub use demo_llm::{DemoLlmGateway, DemoLlmSession};
pub use mcp::{McpClient, McpToolRegistry};
pub use session::InMemorySessionStore;
pub use stream::StreamHub;
