//! A feature-illustrative `LlmGateway`/`LlmSession` adapter.
//!
//! The real LLM provider binding is explicitly out of scope (§1 — LLM
//! collaborators are specified only as contracts), but the crate must still
//! be a complete, runnable binary (the ambient stack). This adapter plays
//! the same role the teacher's `CopilotLlmGateway` plays for Copilot CLI:
//! something concrete to wire into the CLI binary and to drive end-to-end
//! tests against, implemented with canned/templated replies instead of a
//! live model.

pub mod gateway;
pub mod session;

pub use gateway::DemoLlmGateway;
pub use session::DemoLlmSession;
