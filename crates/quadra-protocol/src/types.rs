//! Envelope, system messages, and identity types.
//!
//! Everything here has a pinned JSON shape — the browser client parses
//! these messages, so the serde attributes are part of the contract,
//! not an implementation detail. The tests at the bottom lock the
//! shapes down.

use std::fmt;

use serde::{Deserialize, Serialize};

use quadra_engine::{Phase, PlayerId};

use crate::{GameCommand, GameEvent};

/// A unique identifier for a match (one game from formation to
/// completion).
///
/// Serialized as a plain number, like `PlayerId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

/// Who should receive a server event.
///
/// The match actor produces `(Recipient, GameEvent)` pairs; this enum
/// tells the dispatch loop where each one goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every player in the match.
    All,
    /// One specific player.
    Player(PlayerId),
}

/// A summary of a match returned in match listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchListEntry {
    pub match_id: MatchId,
    pub phase: Phase,
    pub player_count: usize,
}

/// Framework-level messages: connection lifecycle, heartbeats, and
/// match routing. Clients never see game state through these — that is
/// [`GameEvent`]'s job.
///
/// Internally tagged (`{"type": "Handshake", ...}`) so the browser
/// side can switch on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SystemMessage {
    // -- Connection lifecycle --
    /// Client → Server: first message on a fresh connection. `token`
    /// is the opaque credential the authenticator understands.
    Handshake { version: u32, token: Option<String> },

    /// Client → Server: alternative first message — resume a recent
    /// session using the reconnection token from a prior handshake.
    Resume { reconnect_token: String },

    /// Server → Client: connection accepted. Carries the assigned
    /// identity and the token to present in a future `Resume`.
    HandshakeAck {
        player_id: PlayerId,
        reconnect_token: String,
    },

    /// Either direction: orderly goodbye with a loggable reason.
    Disconnect { reason: String },

    // -- Heartbeat --
    /// Client → Server: keep-alive. `client_time` is echoed back so
    /// the client can measure round-trip time.
    Heartbeat { client_time: u64 },

    /// Server → Client: heartbeat echo plus server clock.
    HeartbeatAck { client_time: u64, server_time: u64 },

    // -- Match routing --
    /// Client → Server: join a specific match.
    JoinMatch { match_id: MatchId },

    /// Client → Server: join any forming match, or create one.
    QuickMatch,

    /// Client → Server: leave the current match.
    LeaveMatch,

    /// Client → Server: list matches that are still forming.
    ListMatches,

    /// Server → Client: the forming matches.
    MatchList { matches: Vec<MatchListEntry> },

    /// Server → Client: confirmation of a join.
    MatchJoined { match_id: MatchId },

    // -- Errors --
    /// Server → Client: a request failed. `code` follows HTTP-style
    /// conventions (400 bad request, 401 unauthorized, 404 not found).
    Error { code: u16, message: String },
}

/// The content of an envelope.
///
/// Adjacently tagged (`{"type": "Command", "data": {...}}`) so the
/// dispatch loop can tell plumbing from game traffic with one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Payload {
    /// Connection/match plumbing.
    System(SystemMessage),
    /// Client → Server game input.
    Command(GameCommand),
    /// Server → Client game output.
    Event(GameEvent),
}

/// The top-level wire format. Every message is an `Envelope`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Auto-incrementing per-sender sequence number, for spotting
    /// missing or reordered messages in captures.
    pub seq: u64,

    /// Milliseconds since the sender's connection started.
    pub timestamp: u64,

    pub payload: Payload,
}
