//! # Quadra
//!
//! Server-authoritative four-in-a-row for web clients.
//!
//! Quadra keeps all game state on the server: clients send commands
//! (drop a token in column 3), the server validates them against the
//! rules, and every player in the match receives the resulting events.
//! Each match runs on its own Tokio task, so concurrent matches never
//! contend with each other.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use quadra::prelude::*;
//!
//! # async fn run(auth: impl Authenticator) -> Result<(), QuadraError> {
//! let server = QuadraServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(auth)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::QuadraError;
pub use server::{QuadraServer, QuadraServerBuilder, PROTOCOL_VERSION};

/// Everything needed to run a server or write a client in one import.
pub mod prelude {
    pub use crate::{
        QuadraError, QuadraServer, QuadraServerBuilder, PROTOCOL_VERSION,
    };

    pub use quadra_engine::{
        BoardConfig, EngineError, Grid, Phase, PlayerId, Symbol,
    };
    pub use quadra_match::{MatchConfig, MatchError, MatchManager};
    pub use quadra_protocol::{
        Codec, Envelope, GameCommand, GameEvent, JsonCodec, MatchId,
        MatchListEntry, Payload, ProtocolError, Recipient, SystemMessage,
    };
    pub use quadra_session::{
        Authenticator, Identity, SessionConfig, SessionError,
    };
    pub use quadra_transport::{
        Connection, Transport, TransportError, WebSocketTransport,
    };
}
