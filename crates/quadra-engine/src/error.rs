//! Error taxonomy for the game engine.
//!
//! Every variant is a structured rejection of a single call. None of
//! them mutate state and none are fatal — the session stays usable
//! after any of these, and surfacing them to a user is the gateway's
//! job, not the engine's.

use crate::PlayerId;

/// Errors returned by [`Board`](crate::Board), [`PlayerRoster`](crate::PlayerRoster),
/// and [`GameSession`](crate::GameSession) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The column index is outside `[0, width)`.
    #[error("column {column} is out of range (board is {width} wide)")]
    InvalidColumn { column: usize, width: usize },

    /// Every cell in the column is already occupied.
    #[error("column {0} is full")]
    ColumnFull(usize),

    /// Two players are already registered.
    #[error("the roster already has two players")]
    RosterFull,

    /// The player id was never registered in this session.
    #[error("player {0} is not part of this game")]
    UnknownPlayer(PlayerId),

    /// Players can only be added while the session is forming.
    #[error("the game is no longer accepting players")]
    SessionNotForming,

    /// `start` requires a complete roster.
    #[error("cannot start without two players")]
    NotEnoughPlayers,

    /// The game has already started.
    #[error("the game has already started")]
    AlreadyStarted,

    /// It is the other player's turn.
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    /// Moves are only valid once the game has started.
    #[error("the game has not started yet")]
    MatchNotStarted,

    /// The game already finished; no further moves or starts.
    #[error("the game is over")]
    MatchOver,

    /// The board configuration cannot produce a playable game.
    #[error("invalid board configuration: {0}")]
    InvalidConfig(String),
}
