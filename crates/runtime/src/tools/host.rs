//! Tool host trait and invocation results.

use std::future::Future;

use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::{Map, Value};

use crate::Result;

/// What a tool host sent back for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolInvocationResult {
    /// A typed content list (text, images, resources, ...).
    Content(Vec<Content>),
    /// Any other payload; not interpreted.
    Opaque(Value),
}

impl From<CallToolResult> for ToolInvocationResult {
    fn from(result: CallToolResult) -> Self {
        if result.content.is_empty() {
            Self::Opaque(result.structured_content.unwrap_or(Value::Null))
        } else {
            Self::Content(result.content)
        }
    }
}

/// Trait for tool execution hosts.
///
/// This is the boundary between the turn and remote side effects.
pub trait ToolHost: Send + Sync {
    /// Ask the host which tools it offers.
    fn list_tools(&self) -> impl Future<Output = Result<Vec<Tool>>> + Send;

    /// Run one tool. The caller has already checked the name against the
    /// catalog.
    fn invoke(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> impl Future<Output = Result<ToolInvocationResult>> + Send;
}
