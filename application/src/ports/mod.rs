//! Port definitions (interfaces for external adapters).
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod llm_gateway;
pub mod schema_coercer;
pub mod session_store;
pub mod stream_hub;
pub mod tool_registry;

pub use llm_gateway::{GatewayError, LlmGateway, LlmSession, StreamHandle};
pub use schema_coercer::{coerce_arguments, CoercionError};
pub use session_store::SessionStorePort;
pub use stream_hub::StreamHubPort;
pub use tool_registry::ToolRegistryPort;
