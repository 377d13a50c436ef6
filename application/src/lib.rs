//! Application layer for the MCP host.
//!
//! This crate contains the workflow's ports and node use cases. It depends
//! only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    coerce_arguments, CoercionError, GatewayError, LlmGateway, LlmSession, SessionStorePort,
    StreamHandle, StreamHubPort, ToolRegistryPort,
};
pub use use_cases::WorkflowExecutor;
