//! Unified error type for the Quadra server.

use quadra_match::MatchError;
use quadra_protocol::ProtocolError;
use quadra_session::SessionError;
use quadra_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `quadra` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum QuadraError {
    /// A transport-level error (connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (auth, reconnect, expired).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A match-level error (not found, already in one, game rules).
    #[error(transparent)]
    Match(#[from] MatchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::SendFailed(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "gone",
        ));
        let quadra_err: QuadraError = err.into();
        assert!(matches!(quadra_err, QuadraError::Transport(_)));
        assert!(quadra_err.to_string().contains("send failed"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let quadra_err: QuadraError = err.into();
        assert!(matches!(quadra_err, QuadraError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::AuthFailed("nope".into());
        let quadra_err: QuadraError = err.into();
        assert!(matches!(quadra_err, QuadraError::Session(_)));
    }

    #[test]
    fn test_from_match_error() {
        let err = MatchError::NotFound(quadra_protocol::MatchId(1));
        let quadra_err: QuadraError = err.into();
        assert!(matches!(quadra_err, QuadraError::Match(_)));
    }
}
