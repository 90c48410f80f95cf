//! Completion backend abstraction.
//!
//! The orchestrator talks to the model service only through
//! [`CompletionBackend`], so the provider (and test doubles) can be swapped.

mod anthropic;

pub use anthropic::{AnthropicBackend, AnthropicBackendBuilder};

use crate::Result;
use crate::message::Message;
use std::future::Future;

/// Everything the model sees for one turn.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub history: &'a [Message],
    pub user_message: &'a str,
}

/// Trait for completion backends.
pub trait CompletionBackend: Send + Sync {
    /// Produce the text of the top completion.
    ///
    /// Service failures and empty completions are reported as
    /// [`Error::Upstream`](crate::Error::Upstream).
    fn complete(
        &self,
        request: CompletionRequest<'_>,
    ) -> impl Future<Output = Result<String>> + Send;
}
