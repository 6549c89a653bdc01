//! Wire protocol for Quadra.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`Envelope`], [`SystemMessage`], [`GameCommand`],
//!   [`GameEvent`]) — the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to and from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while
//!   encoding or decoding.
//!
//! The protocol layer sits between the transport (raw bytes) and the
//! session layer (player identity). It knows nothing about sockets or
//! matches — only message shapes. Board vocabulary ([`Symbol`],
//! [`Grid`], [`Phase`]) comes from `quadra-engine` so the wire and the
//! rules never drift apart.

mod codec;
mod error;
mod game;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use game::{GameCommand, GameEvent};
pub use types::{
    Envelope, MatchId, MatchListEntry, Payload, Recipient, SystemMessage,
};

// Identity and board vocabulary shared with the engine.
pub use quadra_engine::{Grid, Phase, PlayerId, Symbol};
