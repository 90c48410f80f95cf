//! Tool catalog and tool host integration.

mod catalog;
mod host;
mod mcp_host;

pub use catalog::ToolCatalog;
pub use host::{ToolHost, ToolInvocationResult};
pub use mcp_host::{ACCESS_TOKEN_ENV, McpToolHost, ROUTING_KEY_ENV};
