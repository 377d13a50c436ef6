//! Domain layer for the MCP host.
//!
//! This crate contains the core entities, value objects, and error types
//! that make up the host's business logic. It has no dependencies on
//! infrastructure or presentation concerns.

pub mod core;
pub mod intent;
pub mod session;
pub mod stream;
pub mod tool;
pub mod turn;

// Re-export commonly used types
pub use core::error::HostError;
pub use intent::{Intent, IntentKind};
pub use session::entities::{Message, Role, Session};
pub use session::stream::StreamEvent;
pub use stream::{StreamConnection, StreamMessage};
pub use tool::{
    ArgField, ArgType, ToolCall, ToolCallError, ToolCallErrorKind, ToolCallRecord, ToolCatalogue,
    ToolDescriptor,
};
pub use turn::{NextStep, ReactState, TurnState};
