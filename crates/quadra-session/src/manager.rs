//! The session registry: every player currently connected, or within
//! the reconnection grace period.
//!
//! # Concurrency note
//!
//! `SessionManager` is deliberately not thread-safe — it is owned by
//! the server state and locked at a higher level. A plain `HashMap`
//! here keeps the locking visible where it matters.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use quadra_protocol::PlayerId;
use rand::Rng;

use crate::{Identity, Session, SessionConfig, SessionError, SessionState};

/// Manages all active player sessions.
///
/// Lifecycle of one session:
///
/// ```text
/// create() ──→ disconnect() ──→ reconnect()
///    │               │
///    │               ▼ (grace elapsed)
///    │          expire_stale() ──→ cleanup_expired()
/// ```
pub struct SessionManager {
    /// Sessions keyed by player id; a player has at most one.
    sessions: HashMap<PlayerId, Session>,

    /// Reconnection token → player id, kept in sync with `sessions`
    /// so a resume is a lookup, not a scan.
    tokens: HashMap<String, PlayerId>,

    config: SessionConfig,
}

impl SessionManager {
    /// Creates an empty manager with the given config.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            tokens: HashMap::new(),
            config,
        }
    }

    /// Creates a session for a freshly authenticated player.
    ///
    /// A leftover disconnected or expired session for the same player
    /// is replaced (and its token invalidated).
    ///
    /// # Errors
    /// [`SessionError::AlreadyConnected`] if the player already has a
    /// Connected session.
    pub fn create(
        &mut self,
        identity: Identity,
    ) -> Result<&Session, SessionError> {
        let player_id = identity.player_id;
        if let Some(existing) = self.sessions.get(&player_id) {
            if matches!(existing.state, SessionState::Connected) {
                return Err(SessionError::AlreadyConnected(player_id));
            }
            self.tokens.remove(&existing.reconnect_token);
        }

        let token = generate_token();
        let session = Session {
            player_id,
            display_name: identity.display_name,
            state: SessionState::Connected,
            reconnect_token: token.clone(),
        };

        self.tokens.insert(token, player_id);
        self.sessions.insert(player_id, session);

        tracing::info!(%player_id, "session created");

        Ok(self.sessions.get(&player_id).expect("just inserted"))
    }

    /// Marks a player as disconnected, starting the grace period.
    ///
    /// # Errors
    /// [`SessionError::NotFound`] if no session exists.
    pub fn disconnect(
        &mut self,
        player_id: PlayerId,
    ) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;

        session.state = SessionState::Disconnected {
            since: Instant::now(),
        };

        tracing::info!(%player_id, "player disconnected, grace period started");
        Ok(())
    }

    /// Resumes a session using its reconnection token.
    ///
    /// # Errors
    /// - [`SessionError::InvalidToken`] — token not recognized
    /// - [`SessionError::SessionExpired`] — grace period elapsed
    /// - [`SessionError::AlreadyConnected`] — session never dropped
    pub fn reconnect(
        &mut self,
        token: &str,
    ) -> Result<&Session, SessionError> {
        let player_id = self
            .tokens
            .get(token)
            .copied()
            .ok_or(SessionError::InvalidToken)?;

        let session = self
            .sessions
            .get_mut(&player_id)
            .ok_or(SessionError::InvalidToken)?;

        match &session.state {
            SessionState::Disconnected { since } => {
                let grace =
                    Duration::from_secs(self.config.reconnect_grace_secs);
                if since.elapsed() > grace {
                    session.state = SessionState::Expired;
                    return Err(SessionError::SessionExpired(player_id));
                }
                session.state = SessionState::Connected;
                tracing::info!(%player_id, "player reconnected");
                Ok(self.sessions.get(&player_id).expect("just modified"))
            }
            SessionState::Connected => {
                Err(SessionError::AlreadyConnected(player_id))
            }
            SessionState::Expired => {
                Err(SessionError::SessionExpired(player_id))
            }
        }
    }

    /// Expires every disconnected session whose grace period elapsed.
    /// Returns the ids that were expired so callers can react (e.g.
    /// remove them from their match) before [`cleanup_expired`](Self::cleanup_expired)
    /// deletes the data.
    pub fn expire_stale(&mut self) -> Vec<PlayerId> {
        let grace = Duration::from_secs(self.config.reconnect_grace_secs);
        let mut expired = Vec::new();

        for session in self.sessions.values_mut() {
            if let SessionState::Disconnected { since } = &session.state {
                if since.elapsed() > grace {
                    session.state = SessionState::Expired;
                    expired.push(session.player_id);
                    tracing::info!(
                        player_id = %session.player_id,
                        "session expired"
                    );
                }
            }
        }

        expired
    }

    /// Removes all expired sessions and invalidates their tokens.
    pub fn cleanup_expired(&mut self) {
        self.sessions.retain(|_, session| {
            if matches!(session.state, SessionState::Expired) {
                self.tokens.remove(&session.reconnect_token);
                false
            } else {
                true
            }
        });
    }

    /// Looks up a session by player id.
    pub fn get(&self, player_id: &PlayerId) -> Option<&Session> {
        self.sessions.get(player_id)
    }

    /// Number of sessions in any state.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Random 32-character hex string: 128 bits, infeasible to guess.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
