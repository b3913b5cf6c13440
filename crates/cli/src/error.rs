//! CLI error types.

use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The tool server could not be reached or rejected the session.
    #[error("mcp server at {url}: {message}")]
    Mcp { url: String, message: String },

    /// The configured model is unavailable.
    #[error(transparent)]
    Model(#[from] runtime::ModelError),

    /// An error occurred while the agent was running.
    #[error(transparent)]
    Runtime(#[from] runtime::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
