//! The game session aggregate: one board, one roster, one lifecycle.
//!
//! `GameSession` is the only public surface the transport layer talks
//! to. It owns its [`Board`] and [`PlayerRoster`] exclusively; nothing
//! outside this module mutates them. Callers are expected to serialize
//! access (the match layer runs each session inside an actor task).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    connects, Board, BoardConfig, EngineError, Grid, PlayerId,
    PlayerRoster, Symbol,
};

/// The lifecycle of a session. One-way only:
///
/// ```text
/// Formation → InProgress → Completed
/// ```
///
/// There is no transition back to `Formation` — a rematch means a new
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for players to join. The board exists but is empty.
    Formation,
    /// Both players joined and the game was started.
    InProgress,
    /// Terminal: a win, a draw, or a forfeit happened.
    Completed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Formation => write!(f, "Formation"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// How a successful move left the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStatus {
    /// The game goes on; the turn passed to the other player.
    Continuing,
    /// The move completed a winning alignment.
    Won,
    /// The board filled up with no winner.
    Draw,
}

/// The result of a successful [`GameSession::play`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// Row the token came to rest in.
    pub row: usize,
    /// Column the token was dropped into.
    pub column: usize,
    /// The mover's symbol.
    pub symbol: Symbol,
    pub status: MoveStatus,
    /// Set iff `status` is `Won`.
    pub winner: Option<PlayerId>,
    /// Board contents after the move, for broadcasting.
    pub grid: Grid,
}

/// A read-only view of the session, valid in any phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub grid: Grid,
    pub phase: Phase,
    /// Whose move it is; `None` outside `InProgress`.
    pub turn: Option<PlayerId>,
    pub winner: Option<PlayerId>,
}

/// One match from formation to completion.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: BoardConfig,
    board: Board,
    roster: PlayerRoster,
    phase: Phase,
    /// Symbol of the player who may move next. Meaningful only while
    /// `InProgress`.
    turn: Symbol,
    winner: Option<PlayerId>,
}

impl GameSession {
    /// Creates a session in `Formation` with an empty board.
    pub fn new(config: BoardConfig) -> Self {
        let board = Board::new(config.width, config.height);
        Self {
            config,
            board,
            roster: PlayerRoster::new(),
            phase: Phase::Formation,
            turn: Symbol::X,
            winner: None,
        }
    }

    /// Registers a player. Valid only during `Formation`.
    ///
    /// # Errors
    /// [`EngineError::SessionNotForming`] outside `Formation`, plus
    /// anything [`PlayerRoster::add_player`] rejects.
    pub fn add_player(
        &mut self,
        id: PlayerId,
        name: &str,
    ) -> Result<Symbol, EngineError> {
        if self.phase != Phase::Formation {
            return Err(EngineError::SessionNotForming);
        }
        self.roster.add_player(id, name)
    }

    /// Removes a player during `Formation`, freeing their symbol.
    ///
    /// This is the disconnect transition for a game that has not
    /// started yet; once `InProgress`, use [`forfeit`](Self::forfeit).
    pub fn remove_player(
        &mut self,
        id: PlayerId,
    ) -> Result<(), EngineError> {
        if self.phase != Phase::Formation {
            return Err(EngineError::SessionNotForming);
        }
        self.roster.remove(id).map(|_| ())
    }

    /// Starts the game. Valid only in `Formation` with a full roster.
    ///
    /// Returns the id of the first mover (the `X` player).
    pub fn start(&mut self) -> Result<PlayerId, EngineError> {
        match self.phase {
            Phase::InProgress => return Err(EngineError::AlreadyStarted),
            Phase::Completed => return Err(EngineError::MatchOver),
            Phase::Formation => {}
        }
        if !self.roster.is_complete() {
            return Err(EngineError::NotEnoughPlayers);
        }

        self.phase = Phase::InProgress;
        self.turn = Symbol::X;
        Ok(self
            .roster
            .holder(Symbol::X)
            .expect("complete roster has an X player")
            .id)
    }

    /// Drops the caller's token into `column`.
    ///
    /// Enforces strict turn alternation, delegates the placement to the
    /// board, and runs the win check anchored at the inserted cell. On
    /// a win or a full board the session transitions to `Completed`;
    /// otherwise the turn marker flips.
    pub fn play(
        &mut self,
        id: PlayerId,
        column: usize,
    ) -> Result<MoveReport, EngineError> {
        match self.phase {
            Phase::Formation => return Err(EngineError::MatchNotStarted),
            Phase::Completed => return Err(EngineError::MatchOver),
            Phase::InProgress => {}
        }

        let symbol = self.roster.symbol_of(id)?;
        if symbol != self.turn {
            return Err(EngineError::NotYourTurn(id));
        }

        let row = self.board.insert(column, symbol)?;

        let status = if connects(
            &self.board,
            row,
            column,
            symbol,
            self.config.win_length,
        ) {
            self.winner = Some(id);
            self.phase = Phase::Completed;
            MoveStatus::Won
        } else if self.board.is_full() {
            self.phase = Phase::Completed;
            MoveStatus::Draw
        } else {
            self.turn = symbol.other();
            MoveStatus::Continuing
        };

        Ok(MoveReport {
            row,
            column,
            symbol,
            status,
            winner: self.winner,
            grid: self.board.snapshot(),
        })
    }

    /// Ends an in-progress game with the *other* player as winner.
    ///
    /// This is the disconnect transition for a running game: the
    /// remaining player wins by forfeit. Returns the winner's id.
    pub fn forfeit(&mut self, id: PlayerId) -> Result<PlayerId, EngineError> {
        match self.phase {
            Phase::Formation => return Err(EngineError::MatchNotStarted),
            Phase::Completed => return Err(EngineError::MatchOver),
            Phase::InProgress => {}
        }

        let symbol = self.roster.symbol_of(id)?;
        let winner = self
            .roster
            .holder(symbol.other())
            .expect("in-progress game has two players")
            .id;

        self.winner = Some(winner);
        self.phase = Phase::Completed;
        Ok(winner)
    }

    /// A read-only snapshot, valid in any phase.
    pub fn snapshot(&self) -> BoardView {
        BoardView {
            grid: self.board.snapshot(),
            phase: self.phase,
            turn: self.turn_player(),
            winner: self.winner,
        }
    }

    /// The player who may move next, while the game is in progress.
    pub fn turn_player(&self) -> Option<PlayerId> {
        if self.phase != Phase::InProgress {
            return None;
        }
        self.roster.holder(self.turn).map(|p| p.id)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// The registered players, X first.
    pub fn players(&self) -> impl Iterator<Item = &crate::Player> {
        self.roster.iter()
    }

    /// Number of registered players.
    pub fn player_count(&self) -> usize {
        self.roster.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    /// A started 7x6 session with players P-1 (X) and P-2 (O).
    fn started() -> GameSession {
        let mut s = GameSession::new(BoardConfig::default());
        s.add_player(pid(1), "ada").unwrap();
        s.add_player(pid(2), "bob").unwrap();
        s.start().unwrap();
        s
    }

    #[test]
    fn test_add_player_first_joiner_gets_x() {
        let mut s = GameSession::new(BoardConfig::default());
        assert_eq!(s.add_player(pid(1), "ada"), Ok(Symbol::X));
        assert_eq!(s.add_player(pid(2), "bob"), Ok(Symbol::O));
    }

    #[test]
    fn test_start_with_one_player_is_rejected() {
        let mut s = GameSession::new(BoardConfig::default());
        s.add_player(pid(1), "ada").unwrap();

        assert_eq!(s.start(), Err(EngineError::NotEnoughPlayers));
        assert_eq!(s.phase(), Phase::Formation);
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut s = started();
        assert_eq!(s.start(), Err(EngineError::AlreadyStarted));
    }

    #[test]
    fn test_start_returns_first_mover() {
        let mut s = GameSession::new(BoardConfig::default());
        s.add_player(pid(1), "ada").unwrap();
        s.add_player(pid(2), "bob").unwrap();

        assert_eq!(s.start(), Ok(pid(1)));
        assert_eq!(s.turn_player(), Some(pid(1)));
    }

    #[test]
    fn test_add_player_after_start_is_rejected() {
        let mut s = started();
        assert_eq!(
            s.add_player(pid(3), "eve"),
            Err(EngineError::SessionNotForming)
        );
    }

    #[test]
    fn test_play_before_start_is_rejected() {
        let mut s = GameSession::new(BoardConfig::default());
        s.add_player(pid(1), "ada").unwrap();

        assert_eq!(s.play(pid(1), 0), Err(EngineError::MatchNotStarted));
    }

    #[test]
    fn test_turn_order_alternates_strictly() {
        let mut s = started();

        // P-2 may not open the game.
        assert_eq!(
            s.play(pid(2), 0),
            Err(EngineError::NotYourTurn(pid(2)))
        );

        // P-1 moves, after which only P-2 may move.
        s.play(pid(1), 0).unwrap();
        assert_eq!(
            s.play(pid(1), 1),
            Err(EngineError::NotYourTurn(pid(1)))
        );
        s.play(pid(2), 1).unwrap();
        assert_eq!(s.turn_player(), Some(pid(1)));
    }

    #[test]
    fn test_play_by_stranger_is_rejected() {
        let mut s = started();
        assert_eq!(
            s.play(pid(9), 0),
            Err(EngineError::UnknownPlayer(pid(9)))
        );
    }

    #[test]
    fn test_horizontal_win_scenario_on_bottom_row() {
        // Alternating drops where P-1 takes columns 0-3
        // on row 0 and P-2 plays elsewhere. The fourth P-1 move wins.
        let mut s = started();

        s.play(pid(1), 0).unwrap();
        s.play(pid(2), 0).unwrap();
        s.play(pid(1), 1).unwrap();
        s.play(pid(2), 1).unwrap();
        s.play(pid(1), 2).unwrap();
        s.play(pid(2), 2).unwrap();

        let report = s.play(pid(1), 3).unwrap();
        assert_eq!(report.status, MoveStatus::Won);
        assert_eq!(report.winner, Some(pid(1)));
        assert_eq!(report.row, 0);
        assert_eq!(s.phase(), Phase::Completed);
        assert_eq!(s.winner(), Some(pid(1)));
    }

    #[test]
    fn test_play_after_completion_is_rejected() {
        let mut s = started();
        s.play(pid(1), 0).unwrap();
        s.play(pid(2), 0).unwrap();
        s.play(pid(1), 1).unwrap();
        s.play(pid(2), 1).unwrap();
        s.play(pid(1), 2).unwrap();
        s.play(pid(2), 2).unwrap();
        s.play(pid(1), 3).unwrap(); // X wins

        assert_eq!(s.play(pid(2), 3), Err(EngineError::MatchOver));
    }

    #[test]
    fn test_out_of_range_column_leaves_grid_unchanged() {
        let mut s = started();
        let before = s.snapshot();

        let result = s.play(pid(1), 7);

        assert_eq!(
            result,
            Err(EngineError::InvalidColumn { column: 7, width: 7 })
        );
        assert_eq!(s.snapshot(), before);
        // Still P-1's turn — a rejected move must not flip the marker.
        assert_eq!(s.turn_player(), Some(pid(1)));
    }

    #[test]
    fn test_full_board_without_winner_is_a_draw() {
        // Fill all 42 cells without ever making four-in-a-row. The
        // target position stacks symbols in vertical pairs with the
        // pairing offset by one per column (runs of at most three in
        // every direction); the script below reaches it with strictly
        // alternating, gravity-valid drops. Since every intermediate
        // position is a subset of the final win-free grid, no move can
        // win early.
        const DRAW_SCRIPT: [usize; 42] = [
            0, 1, 0, 1, 2, 3, 2, 3, 4, 5, 4, 5, 6, 0, 6, 0, 0, 6, 0,
            6, 1, 2, 1, 2, 3, 4, 3, 4, 5, 1, 5, 1, 2, 5, 2, 5, 4, 3,
            4, 3, 6, 6,
        ];

        let mut s = started();
        let mut last = None;
        for (i, &col) in DRAW_SCRIPT.iter().enumerate() {
            let mover = if i % 2 == 0 { pid(1) } else { pid(2) };
            let report = s.play(mover, col).unwrap();
            if i + 1 < DRAW_SCRIPT.len() {
                assert_eq!(
                    report.status,
                    MoveStatus::Continuing,
                    "unexpected early finish at move {i}"
                );
            }
            last = Some(report);
        }

        let last = last.unwrap();
        assert_eq!(last.status, MoveStatus::Draw);
        assert_eq!(last.winner, None);
        assert_eq!(s.phase(), Phase::Completed);
        assert_eq!(s.winner(), None);
    }

    #[test]
    fn test_forfeit_makes_remaining_player_winner() {
        let mut s = started();
        s.play(pid(1), 3).unwrap();

        let winner = s.forfeit(pid(1)).unwrap();

        assert_eq!(winner, pid(2));
        assert_eq!(s.phase(), Phase::Completed);
        assert_eq!(s.winner(), Some(pid(2)));
    }

    #[test]
    fn test_forfeit_before_start_is_rejected() {
        let mut s = GameSession::new(BoardConfig::default());
        s.add_player(pid(1), "ada").unwrap();

        assert_eq!(s.forfeit(pid(1)), Err(EngineError::MatchNotStarted));
    }

    #[test]
    fn test_remove_player_during_formation_frees_symbol() {
        let mut s = GameSession::new(BoardConfig::default());
        s.add_player(pid(1), "ada").unwrap();
        s.add_player(pid(2), "bob").unwrap();

        s.remove_player(pid(1)).unwrap();

        assert_eq!(s.player_count(), 1);
        assert_eq!(s.add_player(pid(3), "eve"), Ok(Symbol::X));
    }

    #[test]
    fn test_remove_player_after_start_is_rejected() {
        let mut s = started();
        assert_eq!(
            s.remove_player(pid(1)),
            Err(EngineError::SessionNotForming)
        );
    }

    #[test]
    fn test_snapshot_before_start_is_empty_formation() {
        let s = GameSession::new(BoardConfig::default());
        let view = s.snapshot();

        assert_eq!(view.phase, Phase::Formation);
        assert_eq!(view.turn, None);
        assert_eq!(view.winner, None);
        assert!(view
            .grid
            .iter()
            .all(|row| row.iter().all(Option::is_none)));
        assert_eq!(view.grid.len(), 6);
        assert_eq!(view.grid[0].len(), 7);
    }
}
