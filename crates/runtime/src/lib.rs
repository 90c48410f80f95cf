//! toolrelay runtime: brokering a conversational turn between a user, a
//! completion service and an MCP tool host.
//!
//! # Overview
//!
//! - **TurnOrchestrator**: runs a turn. It renders the tool catalog into a
//!   system prompt, asks the completion service for a reply, looks for a
//!   tool-invocation intent in that reply and, if there is one, calls the
//!   tool and turns its result into a confirmation message.
//! - **Connector**: creates the completion backend and the tool host the
//!   first time a turn needs them.
//! - **CompletionBackend**: a trait over the model service (Anthropic).
//! - **ToolHost**: a trait over the tool-execution host (MCP over stdio).
//!
//! # Example
//!
//! ```ignore
//! use runtime::{CompletionConfig, Message, ServiceConnector, ToolHostConfig, TurnOrchestrator};
//!
//! # async fn example() -> runtime::Result<()> {
//! let connector = ServiceConnector::new(CompletionConfig::default(), ToolHostConfig::default());
//! let orchestrator = TurnOrchestrator::new(connector);
//!
//! let history = vec![Message::user("hi"), Message::assistant("Hello! How can I help?")];
//! for message in orchestrator.run_turn("Add Jane as a contact", &history).await? {
//!     println!("{}", message.content);
//! }
//! # Ok(())
//! # }
//! ```

mod backend;
mod config;
mod connector;
mod error;
mod intent;
mod message;
mod normalize;
mod orchestrator;
mod prompt;
mod tools;

pub use backend::{
    AnthropicBackend, AnthropicBackendBuilder, CompletionBackend, CompletionRequest,
};
pub use config::{CompletionConfig, ToolHostConfig};
pub use connector::{Connector, ServiceConnector};
pub use error::{Error, Result};
pub use intent::{ToolInvocationIntent, extract_intent};
pub use message::{Message, Role};
pub use normalize::normalize_result;
pub use orchestrator::{FALLBACK_REPLY, TurnOrchestrator};
pub use prompt::system_prompt;
pub use tools::{
    ACCESS_TOKEN_ENV, McpToolHost, ROUTING_KEY_ENV, ToolCatalog, ToolHost, ToolInvocationResult,
};

pub use rmcp::model::{Content, Tool};
