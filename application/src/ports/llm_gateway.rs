//! LLM Gateway port.
//!
//! Defines how the application layer talks to a chat-completion provider.
//! Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use mcphost_domain::StreamEvent;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during LLM gateway operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("session error: {0}")]
    SessionError(String),

    #[error("model not available: {0}")]
    ModelNotAvailable(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("timeout")]
    Timeout,

    #[error("transport closed")]
    TransportClosed,
}

/// A handle to a streaming completion in progress.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

/// Gateway for LLM communication.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a session bound to the given model, no system prompt.
    async fn create_session(&self, model: &str) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Create a session with a fixed system prompt, used for classifier and
    /// ReAct sessions.
    async fn create_session_with_system_prompt(
        &self,
        model: &str,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// The provider's advertised model names.
    async fn available_models(&self) -> Result<Vec<String>, GatewayError>;
}

/// An active chat-completion session.
#[async_trait]
pub trait LlmSession: Send + Sync {
    fn model(&self) -> &str;

    /// Send a message and wait for the full completion text.
    async fn send(&self, content: &str) -> Result<String, GatewayError>;

    /// Send a message and stream the completion incrementally.
    async fn send_streaming(&self, content: &str) -> Result<StreamHandle, GatewayError>;
}
