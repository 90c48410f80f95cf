//! MCP-backed tool host.
//!
//! The tool host is a child process speaking MCP over stdio, driven through
//! the rmcp client. Messages from the host are newline-delimited and capped
//! at [`MAX_MESSAGE_SIZE`]. Its stderr is forwarded to `tracing` under the
//! `tool_host` target.

use std::process::Stdio;
use std::time::Duration;

use futures::{Stream, StreamExt, future};
use rmcp::{
    RoleClient, ServiceError, ServiceExt,
    model::{CallToolRequestParams, Tool},
    service::{RunningService, RxJsonRpcMessage, TxJsonRpcMessage},
    transport::async_rw::JsonRpcMessageCodec,
};
use serde_json::{Map, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{info, warn};

use super::{ToolHost, ToolInvocationResult};
use crate::config::{self, ToolHostConfig};
use crate::{Error, Result};

/// Environment variable the host process reads its access token from.
pub const ACCESS_TOKEN_ENV: &str = "TOOL_HOST_ACCESS_TOKEN";

/// Environment variable the host process reads its routing key from.
pub const ROUTING_KEY_ENV: &str = "TOOL_HOST_ROUTING_KEY";

/// Longest line accepted from the host's stdout (1 MiB). A longer line
/// closes the connection.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Tool host backed by an MCP server child process.
pub struct McpToolHost {
    name: String,
    service: RunningService<RoleClient, ()>,
    timeout: Duration,
    // Killed on drop.
    _child: Child,
}

impl McpToolHost {
    /// Spawn the configured server with its credentials and complete the
    /// MCP handshake.
    pub async fn connect(config: &ToolHostConfig) -> Result<Self> {
        let access_token = config::require(
            &config.access_token,
            "tool_host.access_token (TOOL_HOST_ACCESS_TOKEN)",
        )?;
        let routing_key = config::require(
            &config.routing_key,
            "tool_host.routing_key (TOOL_HOST_ROUTING_KEY)",
        )?;
        if config.command.trim().is_empty() {
            return Err(Error::Config("tool_host.command is not set".into()));
        }

        let name = config.name.clone();
        let timeout = config.timeout();

        let mut child = Command::new(&config.command)
            .args(&config.args)
            .envs(&config.env)
            .env(ACCESS_TOKEN_ENV, access_token)
            .env(ROUTING_KEY_ENV, routing_key)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Connection(format!("failed to start {name}: {e}")))?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(Error::Connection(format!("{name} stdio was not captured")));
        };
        if let Some(stderr) = child.stderr.take() {
            forward_diagnostics(name.clone(), stderr);
        }

        let transport = stdio_transport(&name, stdin, stdout);
        let service = tokio::time::timeout(timeout, ().serve(transport))
            .await
            .map_err(|_| Error::Connection(format!("handshake with {name} timed out")))?
            .map_err(|e| Error::Connection(format!("handshake with {name} failed: {e}")))?;

        match service.peer_info() {
            Some(peer) => info!(
                host = %name,
                server = %peer.server_info.name,
                version = %peer.server_info.version,
                "connected to tool host"
            ),
            None => info!(host = %name, "connected to tool host"),
        }

        Ok(Self {
            name,
            service,
            timeout,
            _child: child,
        })
    }
}

impl ToolHost for McpToolHost {
    async fn list_tools(&self) -> Result<Vec<Tool>> {
        tokio::time::timeout(self.timeout, self.service.list_all_tools())
            .await
            .map_err(|_| Error::Connection(format!("tool discovery on {} timed out", self.name)))?
            .map_err(|e| match e {
                ServiceError::UnexpectedResponse | ServiceError::McpError(_) => {
                    Error::Protocol(format!("tool discovery: {e}"))
                }
                other => Error::Connection(format!("tool discovery: {other}")),
            })
    }

    async fn invoke(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<ToolInvocationResult> {
        let params = CallToolRequestParams {
            meta: None,
            name: name.to_string().into(),
            arguments: Some(arguments),
            task: None,
        };

        let result = tokio::time::timeout(self.timeout, self.service.call_tool(params))
            .await
            .map_err(|_| Error::ToolExecution(format!("{name} timed out")))?
            .map_err(|e| match e {
                ServiceError::UnexpectedResponse => {
                    Error::ToolExecution(format!("{name} returned an empty or malformed result"))
                }
                other => Error::ToolExecution(format!("{name}: {other}")),
            })?;

        if result.is_error == Some(true) {
            let detail = result
                .content
                .iter()
                .filter_map(|item| item.as_text())
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            return Err(Error::ToolExecution(format!("{name}: {detail}")));
        }

        if result.content.is_empty() && result.structured_content.is_none() {
            return Err(Error::ToolExecution(format!("{name} returned an empty result")));
        }

        Ok(result.into())
    }
}

/// Newline-delimited JSON-RPC over the child's pipes. The reader ends at the
/// first undecodable or oversized line, which closes the session.
fn stdio_transport(
    name: &str,
    stdin: ChildStdin,
    stdout: ChildStdout,
) -> (
    FramedWrite<ChildStdin, JsonRpcMessageCodec<TxJsonRpcMessage<RoleClient>>>,
    impl Stream<Item = RxJsonRpcMessage<RoleClient>> + Send + Unpin + 'static,
) {
    let host = name.to_string();
    let reader = FramedRead::new(
        stdout,
        JsonRpcMessageCodec::<RxJsonRpcMessage<RoleClient>>::new_with_max_length(
            MAX_MESSAGE_SIZE,
        ),
    )
    .filter_map(move |item| {
        if let Err(e) = &item {
            warn!(host = %host, "closing tool host connection: {e}");
        }
        future::ready(item.ok())
    });
    let writer = FramedWrite::new(stdin, JsonRpcMessageCodec::default());
    (writer, reader)
}

fn forward_diagnostics(host: String, stderr: ChildStderr) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => info!(target: "tool_host", host = %host, "{line}"),
                Ok(None) => break,
                Err(e) => {
                    warn!(target: "tool_host", host = %host, "stderr closed: {e}");
                    break;
                }
            }
        }
    });
}
