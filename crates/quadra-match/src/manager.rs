//! Match manager: creates, tracks, and routes players to matches.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use quadra_engine::{PlayerId, Symbol};
use quadra_protocol::{GameCommand, MatchId};

use crate::actor::spawn_match;
use crate::{MatchConfig, MatchError, MatchHandle, MatchInfo, PlayerSender};

/// Counter for generating unique match IDs.
static NEXT_MATCH_ID: AtomicU64 = AtomicU64::new(1);

/// Manages all active matches and tracks which player is in which
/// match.
///
/// This is the entry point for match operations from the gateway
/// layer. Matches are keyed by ID; each player is in at most ONE match
/// at a time (key invariant).
pub struct MatchManager {
    /// Active matches, keyed by match ID.
    matches: HashMap<MatchId, MatchHandle>,

    /// Maps each player to the match they're currently in.
    player_matches: HashMap<PlayerId, MatchId>,

    config: MatchConfig,
}

impl MatchManager {
    /// Creates a new, empty match manager.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            matches: HashMap::new(),
            player_matches: HashMap::new(),
            config,
        }
    }

    /// Creates a new match and returns its ID.
    pub fn create_match(&mut self) -> MatchId {
        let match_id =
            MatchId(NEXT_MATCH_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_match(match_id, &self.config);
        self.matches.insert(match_id, handle);
        tracing::info!(%match_id, "match created");
        match_id
    }

    /// Adds a player to a match and returns their assigned symbol.
    ///
    /// Enforces the "one match at a time" invariant.
    pub async fn join_match(
        &mut self,
        player_id: PlayerId,
        name: &str,
        match_id: MatchId,
        sender: PlayerSender,
    ) -> Result<Symbol, MatchError> {
        if let Some(current) = self.player_matches.get(&player_id) {
            return Err(MatchError::AlreadyInMatch(player_id, *current));
        }

        let handle = self
            .matches
            .get(&match_id)
            .ok_or(MatchError::NotFound(match_id))?;

        let symbol =
            handle.join(player_id, name.to_owned(), sender).await?;
        self.player_matches.insert(player_id, match_id);
        Ok(symbol)
    }

    /// Removes a player from their current match.
    ///
    /// If the game was running, this forfeits it and the remaining
    /// player wins.
    pub async fn leave_match(
        &mut self,
        player_id: PlayerId,
    ) -> Result<MatchId, MatchError> {
        let match_id = self
            .player_matches
            .get(&player_id)
            .copied()
            .ok_or(MatchError::NotInMatch(player_id))?;

        if let Some(handle) = self.matches.get(&match_id) {
            handle.leave(player_id).await?;
        }

        self.player_matches.remove(&player_id);
        Ok(match_id)
    }

    /// Routes a game command from a player to their current match.
    pub async fn route_command(
        &self,
        player_id: PlayerId,
        command: GameCommand,
    ) -> Result<(), MatchError> {
        let match_id = self
            .player_matches
            .get(&player_id)
            .ok_or(MatchError::NotInMatch(player_id))?;

        let handle = self
            .matches
            .get(match_id)
            .ok_or(MatchError::NotFound(*match_id))?;

        handle.send_command(player_id, command).await
    }

    /// Returns info about a specific match.
    pub async fn match_info(
        &self,
        match_id: MatchId,
    ) -> Result<MatchInfo, MatchError> {
        let handle = self
            .matches
            .get(&match_id)
            .ok_or(MatchError::NotFound(match_id))?;
        handle.info().await
    }

    /// Shuts down a match and removes all its players from the index.
    pub async fn destroy_match(
        &mut self,
        match_id: MatchId,
    ) -> Result<(), MatchError> {
        let handle = self
            .matches
            .remove(&match_id)
            .ok_or(MatchError::NotFound(match_id))?;

        let _ = handle.shutdown().await;
        self.player_matches.retain(|_, mid| *mid != match_id);

        tracing::info!(%match_id, "match destroyed");
        Ok(())
    }

    /// Returns the match ID a player is currently in, if any.
    pub fn player_match(&self, player_id: &PlayerId) -> Option<MatchId> {
        self.player_matches.get(player_id).copied()
    }

    /// Lists all matches that are still accepting players.
    ///
    /// Queries each match actor for its current info. Matches that
    /// fail to respond (shutting down) are silently skipped.
    pub async fn list_matches(&self) -> Vec<MatchInfo> {
        let mut infos = Vec::with_capacity(self.matches.len());
        for handle in self.matches.values() {
            if let Ok(info) = handle.info().await {
                if info.is_joinable() {
                    infos.push(info);
                }
            }
        }
        infos
    }

    /// Finds a joinable match or creates a new one, then joins the
    /// player. Returns the match ID and the assigned symbol.
    ///
    /// Simple matchmaking: scan existing matches for one still in
    /// formation with a free seat, join it. If none found, create a
    /// fresh match and join that.
    pub async fn quick_match(
        &mut self,
        player_id: PlayerId,
        name: &str,
        sender: PlayerSender,
    ) -> Result<(MatchId, Symbol), MatchError> {
        if let Some(current) = self.player_matches.get(&player_id) {
            return Err(MatchError::AlreadyInMatch(player_id, *current));
        }

        // If join() fails due to a race (seat taken between info and
        // join), keep searching.
        for handle in self.matches.values() {
            if let Ok(info) = handle.info().await {
                if info.is_joinable() {
                    if let Ok(symbol) = handle
                        .join(player_id, name.to_owned(), sender.clone())
                        .await
                    {
                        self.player_matches
                            .insert(player_id, info.match_id);
                        return Ok((info.match_id, symbol));
                    }
                }
            }
        }

        // No joinable match found, create one.
        let match_id = self.create_match();
        let handle = self
            .matches
            .get(&match_id)
            .expect("just created this match");
        let symbol = handle.join(player_id, name.to_owned(), sender).await?;
        self.player_matches.insert(player_id, match_id);
        Ok((match_id, symbol))
    }

    /// Returns the number of active matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Lists all active match IDs.
    pub fn match_ids(&self) -> Vec<MatchId> {
        self.matches.keys().copied().collect()
    }
}

impl Default for MatchManager {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
