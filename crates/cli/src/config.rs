//! Configuration loading from toolrelay.toml.

use runtime::{
    ACCESS_TOKEN_ENV, CompletionConfig, ROUTING_KEY_ENV, ServiceConnector, ToolHostConfig,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Environment variable holding the completion service key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Completion service settings.
    pub completion: CompletionConfig,

    /// Tool host process and credentials.
    pub tool_host: ToolHostConfig,

    /// HTTP server settings.
    pub server: ServerConfig,
}

/// HTTP server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Fill unset credentials from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fill(&mut self.completion.api_key, lookup(API_KEY_ENV));
        fill(&mut self.tool_host.access_token, lookup(ACCESS_TOKEN_ENV));
        fill(&mut self.tool_host.routing_key, lookup(ROUTING_KEY_ENV));
    }

    /// Build the connector the orchestrator uses to reach both services.
    pub fn connector(&self) -> ServiceConnector {
        ServiceConnector::new(self.completion.clone(), self.tool_host.clone())
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}
