//! Demo `LlmGateway`: creates [`DemoLlmSession`]s directly, with no
//! subprocess or network connection — the teacher's `CopilotLlmGateway`
//! spawns and routes through a CLI subprocess; this one has nothing to
//! spawn since there is no real provider in scope.

use super::session::DemoLlmSession;
use async_trait::async_trait;
use mcphost_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};

pub struct DemoLlmGateway;

impl DemoLlmGateway {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DemoLlmGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmGateway for DemoLlmGateway {
    async fn create_session(&self, model: &str) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(DemoLlmSession::new(model, None)))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &str,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(DemoLlmSession::new(model, Some(system_prompt.to_string()))))
    }

    async fn available_models(&self) -> Result<Vec<String>, GatewayError> {
        Ok(vec!["demo-mini".to_string()])
    }
}
