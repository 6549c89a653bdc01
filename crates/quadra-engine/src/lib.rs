//! Game rules for Quadra, a four-in-a-row board game.
//!
//! This crate is the authoritative rule book. Everything in it is
//! synchronous and in-memory; it never does I/O, never logs, and never
//! panics on bad input — every invalid operation comes back as an
//! [`EngineError`] and leaves the state untouched.
//!
//! # Key types
//!
//! - [`Board`] — the grid with gravity-based column insertion
//! - [`PlayerRoster`] — the two participants and their symbols
//! - [`GameSession`] — the aggregate driving the Formation →
//!   InProgress → Completed lifecycle
//! - [`EngineError`] — every way a call can be rejected

use std::fmt;

use serde::{Deserialize, Serialize};

mod board;
mod config;
mod error;
mod roster;
mod session;
mod win;

pub use board::{Board, Grid, Symbol};
pub use config::BoardConfig;
pub use error::EngineError;
pub use roster::{Player, PlayerRoster};
pub use session::{BoardView, GameSession, MoveReport, MoveStatus, Phase};
pub use win::connects;

/// A unique identifier for a player.
///
/// The value is supplied by whatever authenticated the caller — the
/// engine treats it as opaque and only ever compares it for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        // `#[serde(transparent)]` means PlayerId(42) travels as `42`.
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }
}
