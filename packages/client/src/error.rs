//! Error types for the Sanmoku client.

use thiserror::Error;

use sanmoku_server::{domain::ValueObjectError, usecase::LobbyError};

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured server URL cannot be used
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Invalid command-line configuration (lobby id, ...)
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValueObjectError),

    /// The lobby could not be loaded or subscribed to
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// The change feed closed while the client was running
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
