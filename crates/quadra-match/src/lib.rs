//! Match lifecycle management for Quadra.
//!
//! Each match runs as an isolated Tokio task (actor model) owning one
//! [`quadra_engine::GameSession`]. The actor's command channel is the
//! serialization point: all reads and writes of a match's state happen
//! on one task, in arrival order, so two players dropping tokens at the
//! same instant can never interleave mid-move.
//!
//! # Key types
//!
//! - [`MatchManager`] — creates/destroys matches, routes players
//! - [`MatchHandle`] — send commands to a running match actor
//! - [`MatchConfig`] — board dimensions and mailbox size

mod actor;
mod config;
mod error;
mod manager;

pub use actor::{MatchHandle, MatchInfo, PlayerSender};
pub use config::MatchConfig;
pub use error::MatchError;
pub use manager::MatchManager;
