//! One conversational turn: completion, optional tool call, reply.

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::backend::{CompletionBackend, CompletionRequest};
use crate::connector::Connector;
use crate::intent::extract_intent;
use crate::message::Message;
use crate::normalize::normalize_result;
use crate::prompt::system_prompt;
use crate::tools::{ToolCatalog, ToolHost};
use crate::{Error, Result};

/// Reply used when the completion service is unavailable.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again in a moment.";

/// Brokers turns between the user, the completion service and the tool host.
///
/// The completion backend, the tool host connection and the tool catalog
/// are created on first use and kept for the life of the orchestrator.
/// Concurrent first turns wait on a single initializer; a failed
/// initialization leaves that resource unset so the next turn retries it.
pub struct TurnOrchestrator<K: Connector> {
    connector: K,
    completion: OnceCell<K::Completion>,
    tool_host: OnceCell<K::Host>,
    catalog: OnceCell<ToolCatalog>,
}

impl<K: Connector> TurnOrchestrator<K> {
    pub fn new(connector: K) -> Self {
        Self {
            connector,
            completion: OnceCell::new(),
            tool_host: OnceCell::new(),
            catalog: OnceCell::new(),
        }
    }

    /// Run one turn and return the messages to append to the conversation.
    ///
    /// The result is either the model's reply alone, or the model's reply
    /// followed by a message describing the outcome of the tool it asked
    /// for. A failing completion service degrades to [`FALLBACK_REPLY`];
    /// every other failure aborts the turn.
    pub async fn run_turn(&self, user_message: &str, history: &[Message]) -> Result<Vec<Message>> {
        let completion = self.completion_backend().await?;
        let (host, catalog) = self.tools().await?;

        let system = system_prompt(catalog);
        let request = CompletionRequest {
            system: &system,
            history,
            user_message,
        };

        let completion_text = match completion.complete(request).await {
            Ok(text) => text,
            Err(Error::Upstream(e)) => {
                warn!("completion failed, replying with fallback: {e}");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => return Err(e),
        };

        let Some(intent) = extract_intent(&completion_text) else {
            debug!("no tool intent in completion");
            return Ok(vec![Message::assistant(completion_text)]);
        };

        if !catalog.contains(&intent.tool_name) {
            return Err(Error::UnknownTool(intent.tool_name));
        }

        info!(tool = %intent.tool_name, "invoking tool");
        let result = host.invoke(&intent.tool_name, intent.arguments).await?;
        let outcome = normalize_result(&intent.tool_name, &result);

        Ok(vec![
            Message::assistant(completion_text),
            Message::assistant(outcome),
        ])
    }

    /// The tool catalog, connecting to the tool host first if needed.
    pub async fn catalog(&self) -> Result<&ToolCatalog> {
        let (_, catalog) = self.tools().await?;
        Ok(catalog)
    }

    /// Whether every shared resource has been created.
    pub fn is_initialized(&self) -> bool {
        self.completion.initialized() && self.tool_host.initialized() && self.catalog.initialized()
    }

    async fn completion_backend(&self) -> Result<&K::Completion> {
        self.completion
            .get_or_try_init(|| async {
                debug!("initializing completion backend");
                self.connector.completion().await
            })
            .await
    }

    async fn tools(&self) -> Result<(&K::Host, &ToolCatalog)> {
        let host = self
            .tool_host
            .get_or_try_init(|| async {
                debug!("connecting to tool host");
                self.connector.tool_host().await
            })
            .await?;

        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                let tools = host.list_tools().await?;
                info!(count = tools.len(), "discovered tools");
                ToolCatalog::new(tools)
            })
            .await?;

        Ok((host, catalog))
    }
}
