//! Error types for the session layer.

use quadra_protocol::PlayerId;

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The authenticator rejected the credential.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// No session exists for the given player.
    #[error("session not found for player {0}")]
    NotFound(PlayerId),

    /// The reconnection token doesn't match anything the server issued.
    #[error("invalid reconnection token")]
    InvalidToken,

    /// The reconnection grace period has elapsed.
    #[error("session expired for player {0}")]
    SessionExpired(PlayerId),

    /// The player already has an active session; one at a time.
    #[error("player {0} already has an active session")]
    AlreadyConnected(PlayerId),
}
