//! Player session management for Quadra.
//!
//! The web shell (HTTP login, cookies, user records) lives outside
//! this codebase; its entire contribution is condensed into the
//! [`Authenticator`] trait, which turns an opaque credential into an
//! [`Identity`] — a player id plus display name. From there this crate
//! tracks who is connected, hands out reconnection tokens, and expires
//! sessions whose owners never came back.
//!
//! ```text
//! Match layer (above)   ← which players are in which matches
//!     ↕
//! Session layer (this crate)   ← identity and connection state
//!     ↕
//! Protocol layer (below)   ← PlayerId, SystemMessage types
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod manager;
mod session;

pub use auth::{Authenticator, Identity};
pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Session, SessionConfig, SessionState};
