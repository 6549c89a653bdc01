//! Game traffic: what players send and what the match broadcasts back.

use serde::{Deserialize, Serialize};

use quadra_engine::{Grid, Phase, PlayerId, Symbol};

/// Client → Server: an input for the player's current match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameCommand {
    /// Begin the game (requires a full roster).
    Start,

    /// Drop a token into the given zero-based column.
    Drop { column: usize },

    /// Ask for the current board snapshot.
    QueryBoard,
}

/// Server → Client: what happened in the match.
///
/// Broadcasts go to every player; rejections go only to the player
/// whose command was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Someone joined the forming match.
    PlayerJoined {
        player_id: PlayerId,
        name: String,
        symbol: Symbol,
    },

    /// Someone left the forming match; their symbol is free again.
    PlayerLeft { player_id: PlayerId },

    /// The game started. `turn` is the player who moves first.
    Started { turn: PlayerId },

    /// A token was placed.
    Moved {
        player_id: PlayerId,
        column: usize,
        row: usize,
        symbol: Symbol,
    },

    /// The board after a move or in answer to a query. `turn` is the
    /// next mover while the game is running.
    Board {
        grid: Grid,
        phase: Phase,
        turn: Option<PlayerId>,
        winner: Option<PlayerId>,
    },

    /// The match is over: a win, a draw (`winner: None`), or a forfeit.
    GameOver {
        winner: Option<PlayerId>,
        reason: String,
    },

    /// A command was refused. State did not change; the sender may try
    /// again.
    Rejected { message: String },
}
