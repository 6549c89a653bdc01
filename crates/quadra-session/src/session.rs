//! Session data: one connected (or recently connected) player.

use std::time::Instant;

use quadra_protocol::PlayerId;

/// Tunables for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a disconnected player has to resume before their
    /// session is permanently expired. 0 disables resumption.
    pub reconnect_grace_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reconnect_grace_secs: 30,
        }
    }
}

/// The connection state of a session.
///
/// ```text
///   Connected ──(disconnect)──→ Disconnected ──(timeout)──→ Expired
///       ↑                            │
///       └────────(reconnect)─────────┘
/// ```
#[derive(Debug, Clone)]
pub enum SessionState {
    /// Player is actively connected.
    Connected,

    /// Player dropped at the given instant; they may resume until the
    /// grace period elapses.
    Disconnected { since: Instant },

    /// Grace period elapsed. Dead, awaiting cleanup.
    Expired,
}

/// A single player's session on the server.
#[derive(Debug, Clone)]
pub struct Session {
    pub player_id: PlayerId,

    /// Display name captured from the [`Identity`](crate::Identity)
    /// at authentication time; survives a resume.
    pub display_name: String,

    pub state: SessionState,

    /// Secret the client presents in a `Resume` to pick this session
    /// back up after a brief network drop. 32 hex chars, 128 bits.
    pub reconnect_token: String,
}
