//! Per-server MCP client: owns one subprocess, fetches its tool catalogue
//! once at startup, and dispatches `tools/call` requests with a timeout.

use super::protocol::{next_request_id, JsonRpcRequest, ToolsCallParams, ToolsListResult};
use super::transport::StdioTransport;
use mcphost_domain::tool::entities::{ArgField, ArgType};
use mcphost_domain::{HostError, ToolDescriptor};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Default per-call timeout (§4.1).
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// One server's live connection plus its discovered tool descriptors.
pub struct McpClient {
    server_id: String,
    transport: Mutex<StdioTransport>,
    tools: Vec<ToolDescriptor>,
}

impl McpClient {
    /// Spawn the subprocess, perform the handshake, and fetch `tools/list`.
    /// Fails the whole initialize if the subprocess can't be spawned
    /// (§6: `SubprocessSpawnFailed` aborts the process).
    pub async fn connect(
        server_id: &str,
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
        cwd: Option<&str>,
    ) -> Result<Self, HostError> {
        let transport = StdioTransport::spawn(server_id, command, args, env, cwd).await?;

        let request = JsonRpcRequest::new(next_request_id("init"), "tools/list", None);
        let response = transport.request(&request).await?;

        if let Some(error) = response.error {
            return Err(HostError::ToolExecutionError {
                server_id: server_id.to_string(),
                tool_name: String::new(),
                message: format!("tools/list failed ({}): {}", error.code, error.message),
            });
        }

        let result: ToolsListResult = match response.result {
            Some(value) => serde_json::from_value(value)?,
            None => ToolsListResult { tools: Vec::new() },
        };

        let tools = result
            .tools
            .into_iter()
            .map(|spec| {
                let arg_schema = spec
                    .arguments
                    .into_iter()
                    .map(|a| {
                        let arg_type = match a.arg_type.as_str() {
                            "integer" => ArgType::Integer,
                            "number" => ArgType::Number,
                            "boolean" => ArgType::Boolean,
                            _ => ArgType::String,
                        };
                        let field = ArgField::new(a.name, arg_type, a.required);
                        match a.default {
                            Some(default) => field.with_default(default),
                            None => field,
                        }
                    })
                    .collect();
                ToolDescriptor::new(spec.name, server_id, spec.description, arg_schema)
            })
            .collect();

        info!("mcp[{server_id}]: connected, {} tool(s) discovered", result_len(&tools));

        Ok(Self {
            server_id: server_id.to_string(),
            transport: Mutex::new(transport),
            tools,
        })
    }

    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub async fn is_alive(&self) -> bool {
        self.transport.lock().await.is_alive()
    }

    /// Invoke `tools/call` with a default 30s timeout. Returns the raw
    /// result text and the request/response JSON texts for audit.
    pub async fn call(
        &self,
        tool_name: &str,
        session_id: &str,
        arguments: &serde_json::Value,
    ) -> Result<(String, String, String), HostError> {
        let request = JsonRpcRequest::new(
            next_request_id(session_id),
            "tools/call",
            Some(serde_json::to_value(ToolsCallParams {
                server: &self.server_id,
                name: tool_name,
                arguments,
            })?),
        );
        let request_text = serde_json::to_string(&request)?;

        let outcome = tokio::time::timeout(DEFAULT_CALL_TIMEOUT, {
            let transport = self.transport.lock();
            async move { transport.await.request(&request).await }
        })
        .await;

        let response = match outcome {
            Ok(result) => result?,
            Err(_) => {
                return Err(HostError::ToolTimeout {
                    server_id: self.server_id.clone(),
                    tool_name: tool_name.to_string(),
                    timeout_ms: DEFAULT_CALL_TIMEOUT.as_millis() as u64,
                })
            }
        };

        let response_text = serde_json::to_string(&serde_json::json!({
            "result": response.result,
            "error": response.error.as_ref().map(|e| &e.message),
        }))
        .unwrap_or_default();

        if let Some(error) = response.error {
            warn!("mcp[{}]: {} failed: {}", self.server_id, tool_name, error.message);
            return Err(HostError::ToolExecutionError {
                server_id: self.server_id.clone(),
                tool_name: tool_name.to_string(),
                message: error.message,
            });
        }

        let result_text = response
            .result
            .map(|v| serde_json::to_string(&v).unwrap_or_default())
            .unwrap_or_default();

        Ok((result_text, request_text, response_text))
    }
}

fn result_len(tools: &[ToolDescriptor]) -> usize {
    tools.len()
}
