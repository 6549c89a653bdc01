//! The two participants of a game and their symbol assignment.

use serde::{Deserialize, Serialize};

use crate::{EngineError, PlayerId, Symbol};

/// One registered participant.
///
/// Immutable once created — the symbol never changes for the lifetime
/// of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub symbol: Symbol,
}

/// Tracks up to two players, assigning symbols by join order.
///
/// Slot 0 holds `X` (the first joiner, who also moves first), slot 1
/// holds `O`. A slot freed by a Formation-phase departure is handed to
/// the next joiner, so the symbol invariant — unique and stable while
/// assigned — holds throughout.
#[derive(Debug, Clone, Default)]
pub struct PlayerRoster {
    slots: [Option<Player>; 2],
}

const SYMBOLS: [Symbol; 2] = [Symbol::X, Symbol::O];

impl PlayerRoster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a player and returns their assigned symbol.
    ///
    /// Registering an id that is already present is idempotent and
    /// returns the symbol assigned the first time.
    ///
    /// # Errors
    /// [`EngineError::RosterFull`] once two players are registered.
    pub fn add_player(
        &mut self,
        id: PlayerId,
        name: &str,
    ) -> Result<Symbol, EngineError> {
        if let Ok(symbol) = self.symbol_of(id) {
            return Ok(symbol);
        }

        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                let symbol = SYMBOLS[i];
                *slot = Some(Player {
                    id,
                    name: name.to_string(),
                    symbol,
                });
                return Ok(symbol);
            }
        }
        Err(EngineError::RosterFull)
    }

    /// The symbol assigned to `id`.
    ///
    /// # Errors
    /// [`EngineError::UnknownPlayer`] if the id was never registered.
    pub fn symbol_of(&self, id: PlayerId) -> Result<Symbol, EngineError> {
        self.iter()
            .find(|p| p.id == id)
            .map(|p| p.symbol)
            .ok_or(EngineError::UnknownPlayer(id))
    }

    /// The player currently holding `symbol`, if any.
    pub fn holder(&self, symbol: Symbol) -> Option<&Player> {
        self.iter().find(|p| p.symbol == symbol)
    }

    /// Removes a player, freeing their symbol slot.
    ///
    /// # Errors
    /// [`EngineError::UnknownPlayer`] if the id was never registered.
    pub fn remove(&mut self, id: PlayerId) -> Result<Player, EngineError> {
        for slot in &mut self.slots {
            if slot.as_ref().is_some_and(|p| p.id == id) {
                return Ok(slot.take().expect("checked above"));
            }
        }
        Err(EngineError::UnknownPlayer(id))
    }

    /// `true` when exactly two players are registered.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Number of registered players.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// `true` when nobody has joined yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the registered players in symbol order (X first).
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}
