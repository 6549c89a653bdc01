//! Error types for the match layer.

use quadra_engine::{EngineError, PlayerId};
use quadra_protocol::MatchId;

/// Errors that can occur during match operations.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// The match does not exist.
    #[error("match {0} not found")]
    NotFound(MatchId),

    /// The player is already in a match.
    #[error("player {0} already in match {1}")]
    AlreadyInMatch(PlayerId, MatchId),

    /// The player is not in any match.
    #[error("player {0} not in any match")]
    NotInMatch(PlayerId),

    /// The match's command channel is full or closed.
    #[error("match {0} is unavailable")]
    Unavailable(MatchId),

    /// The game rules refused the operation.
    #[error(transparent)]
    Game(#[from] EngineError),
}
