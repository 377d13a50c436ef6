//! Newline-delimited JSON-RPC transport over a child process's piped stdio.
//!
//! Grounded on the teacher's `copilot::router::MessageRouter`: a background
//! reader task owns the read half exclusively and demultiplexes frames by
//! `id` to per-call `oneshot` awaiters, while a mutex-guarded writer half
//! serializes writes. The teacher's `MessageRouter` is LSP-style
//! (Content-Length-framed, over TCP); this transport is the same
//! split-halves-plus-id-correlation idiom adapted to newline-delimited
//! framing directly over the child's stdio, per §6.

use super::protocol::JsonRpcResponse;
use mcphost_domain::HostError;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// One child process's transport: an owned writer half plus a background
/// reader task that routes responses by id.
pub struct StdioTransport {
    #[allow(dead_code)]
    child: Child,
    writer: Mutex<BufWriter<ChildStdin>>,
    pending: Arc<RwLock<HashMap<String, oneshot::Sender<JsonRpcResponse>>>>,
    reader_handle: JoinHandle<()>,
}

impl StdioTransport {
    /// Spawn `command args...` with piped stdio and start the reader task.
    pub async fn spawn(
        server_id: &str,
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
        cwd: Option<&str>,
    ) -> Result<Self, HostError> {
        let mut cmd = Command::new(command);
        cmd.args(args)
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| HostError::SubprocessSpawnFailed {
            server_id: server_id.to_string(),
            source,
        })?;

        let stdin = child.stdin.take().ok_or_else(|| HostError::SubprocessSpawnFailed {
            server_id: server_id.to_string(),
            source: std::io::Error::other("failed to capture stdin"),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| HostError::SubprocessSpawnFailed {
            server_id: server_id.to_string(),
            source: std::io::Error::other("failed to capture stdout"),
        })?;

        let pending: Arc<RwLock<HashMap<String, oneshot::Sender<JsonRpcResponse>>>> =
            Arc::new(RwLock::new(HashMap::new()));
        let pending_bg = Arc::clone(&pending);
        let server_id_bg = server_id.to_string();

        let reader_handle = tokio::spawn(async move {
            Self::reader_loop(stdout, pending_bg, server_id_bg).await;
        });

        Ok(Self {
            child,
            writer: Mutex::new(BufWriter::new(stdin)),
            pending,
            reader_handle,
        })
    }

    async fn reader_loop(
        stdout: tokio::process::ChildStdout,
        pending: Arc<RwLock<HashMap<String, oneshot::Sender<JsonRpcResponse>>>>,
        server_id: String,
    ) {
        let mut reader = BufReader::new(stdout);
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = match reader.read_line(&mut line).await {
                Ok(n) => n,
                Err(e) => {
                    warn!("mcp[{server_id}]: reader error: {e}");
                    break;
                }
            };
            if bytes_read == 0 {
                debug!("mcp[{server_id}]: stdout closed");
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            trace!("mcp[{server_id}] <- {trimmed}");

            let response: JsonRpcResponse = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(e) => {
                    warn!("mcp[{server_id}]: malformed frame: {e} — {trimmed}");
                    continue;
                }
            };

            let Some(id) = response.id.clone() else {
                continue;
            };

            let sender = {
                let mut pending = pending.write().await;
                pending.remove(&id)
            };
            match sender {
                Some(tx) => {
                    let _ = tx.send(response);
                }
                None => debug!("mcp[{server_id}]: no pending awaiter for id={id}"),
            }
        }

        let mut pending = pending.write().await;
        pending.clear();
    }

    /// Send a JSON-RPC request and await the correlated response.
    pub async fn request(
        &self,
        request: &super::protocol::JsonRpcRequest,
    ) -> Result<JsonRpcResponse, HostError> {
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.write().await;
            pending.insert(request.id.clone(), tx);
        }

        let line = serde_json::to_string(request)?;
        trace!("mcp -> {line}");
        {
            let mut writer = self.writer.lock().await;
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        rx.await
            .map_err(|_| HostError::ToolExecutionError {
                server_id: String::new(),
                tool_name: String::new(),
                message: "transport closed before a response arrived".to_string(),
            })
    }

    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for StdioTransport {
    fn drop(&mut self) {
        self.reader_handle.abort();
    }
}
