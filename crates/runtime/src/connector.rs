//! Construction of the two external connections.

use std::future::Future;

use crate::Result;
use crate::backend::{AnthropicBackend, CompletionBackend};
use crate::config::{CompletionConfig, ToolHostConfig};
use crate::tools::{McpToolHost, ToolHost};

/// Builds the completion backend and the tool host on first use.
///
/// [`TurnOrchestrator`](crate::TurnOrchestrator) calls each method at most
/// once per successful initialization.
pub trait Connector: Send + Sync {
    type Completion: CompletionBackend + 'static;
    type Host: ToolHost + 'static;

    fn completion(&self) -> impl Future<Output = Result<Self::Completion>> + Send;

    fn tool_host(&self) -> impl Future<Output = Result<Self::Host>> + Send;
}

/// The production wiring: Anthropic for completions, an MCP child process
/// for tools.
#[derive(Debug, Clone, Default)]
pub struct ServiceConnector {
    pub completion: CompletionConfig,
    pub tool_host: ToolHostConfig,
}

impl ServiceConnector {
    pub fn new(completion: CompletionConfig, tool_host: ToolHostConfig) -> Self {
        Self {
            completion,
            tool_host,
        }
    }
}

impl Connector for ServiceConnector {
    type Completion = AnthropicBackend;
    type Host = McpToolHost;

    async fn completion(&self) -> Result<AnthropicBackend> {
        AnthropicBackend::from_config(&self.completion)
    }

    async fn tool_host(&self) -> Result<McpToolHost> {
        McpToolHost::connect(&self.tool_host).await
    }
}
