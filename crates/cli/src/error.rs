//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Configuration could not be read or parsed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A turn or tool discovery failed.
    #[error(transparent)]
    Runtime(#[from] runtime::Error),

    /// A history file or server output could not be (de)serialized.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
