//! Settings for the two external services.
//!
//! Credentials are optional here on purpose: their absence is reported as
//! [`Error::Config`] when a turn first needs them, not at load time.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(60);

/// Completion service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Tool host settings: the command that starts the MCP server and the
/// credentials it is started with.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolHostConfig {
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub access_token: Option<String>,
    pub routing_key: Option<String>,
    pub timeout_secs: u64,
}

impl ToolHostConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ToolHostConfig {
    fn default() -> Self {
        Self {
            name: "tool-host".to_string(),
            command: String::new(),
            args: Vec::new(),
            env: HashMap::new(),
            access_token: None,
            routing_key: None,
            timeout_secs: DEFAULT_TOOL_TIMEOUT.as_secs(),
        }
    }
}

/// Return a credential's value, or a config error naming where to set it.
pub(crate) fn require<'a>(value: &'a Option<String>, hint: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Config(format!("{hint} is not set"))),
    }
}
