//! Tool catalogue domain module.
//!
//! - [`entities::ToolDescriptor`] / [`entities::ToolCatalogue`] — the live
//!   tool inventory aggregated by the Tool Registry
//! - [`entities::ToolCall`] — a coerced, ready-to-dispatch invocation
//! - [`call_record::ToolCallRecord`] — the audit record of one dispatch

pub mod call_record;
pub mod entities;

pub use call_record::{ToolCallError, ToolCallErrorKind, ToolCallRecord};
pub use entities::{ArgField, ArgType, ToolCall, ToolCatalogue, ToolDescriptor};
