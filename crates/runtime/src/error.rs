use thiserror::Error;

/// Everything that can go wrong while brokering a turn.
#[derive(Debug, Error)]
pub enum Error {
    /// A required setting or credential is missing.
    #[error("config error: {0}")]
    Config(String),

    /// The tool host could not be spawned, handshaken with, or reached.
    #[error("tool host connection error: {0}")]
    Connection(String),

    /// The tool host answered with something that is not the expected shape.
    #[error("tool host protocol error: {0}")]
    Protocol(String),

    /// The completion service failed or returned nothing usable.
    #[error("completion service error: {0}")]
    Upstream(String),

    #[error("no tools available from the tool host")]
    NoToolsAvailable,

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("tool execution failed: {0}")]
    ToolExecution(String),
}

pub type Result<T> = std::result::Result<T, Error>;
