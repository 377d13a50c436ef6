//! JSON-RPC 2.0 types for the MCP subprocess wire format (§6).
//!
//! Distinct from `copilot::protocol` in framing only: requests/responses are
//! the same `{jsonrpc, id, method/result/error}` shape, but here they travel
//! newline-delimited over the child's piped stdio rather than
//! Content-Length-framed over a TCP socket (§4.1's transport implementation
//! note).

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic per-process counter backing `host-<session>-<monotonic-ms>` ids.
static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

/// Build a request id of the form `host-<session>-<monotonic-ms>` (§4.1).
/// The sequence number stands in for wall-clock milliseconds since
/// `std::time::SystemTime::now()` is otherwise the only monotonic-enough
/// clock available, and ids only need to be unique per process, not
/// chronological.
pub fn next_request_id(session_id: &str) -> String {
    let seq = REQUEST_SEQ.fetch_add(1, Ordering::SeqCst);
    format!("host-{session_id}-{seq}")
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<String>, method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: id.into(),
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[allow(dead_code)]
    pub jsonrpc: Option<String>,
    pub id: Option<String>,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[allow(dead_code)]
    pub data: Option<serde_json::Value>,
}

/// `tools/list` result entry, as returned by an MCP server.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteToolSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub arguments: Vec<RemoteArgSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteArgSpec {
    pub name: String,
    #[serde(rename = "type", default = "default_arg_type")]
    pub arg_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

fn default_arg_type() -> String {
    "string".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolsListResult {
    #[serde(default)]
    pub tools: Vec<RemoteToolSpec>,
}

/// `tools/call` params: `{server, name, arguments}` per §6.
#[derive(Debug, Clone, Serialize)]
pub struct ToolsCallParams<'a> {
    pub server: &'a str,
    pub name: &'a str,
    pub arguments: &'a serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique_and_prefixed() {
        let a = next_request_id("sess-1");
        let b = next_request_id("sess-1");
        assert_ne!(a, b);
        assert!(a.starts_with("host-sess-1-"));
    }
}
