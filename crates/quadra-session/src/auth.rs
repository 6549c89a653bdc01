//! The authentication boundary.
//!
//! Quadra does not verify credentials itself — the surrounding web
//! application already did that when it issued the token. This module
//! only defines the seam: one async method that maps a token to a
//! player identity. Production wires in a real verifier (JWT, session
//! store lookup); tests and local development use trivial ones.

use quadra_protocol::PlayerId;

use crate::SessionError;

/// Who an authenticated caller is, as reported by the external shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Opaque, stable player id. The engine only compares it.
    pub player_id: PlayerId,
    /// Human-readable name shown to the other player.
    pub display_name: String,
}

/// Validates a client's auth token and returns their identity.
///
/// Called once per connection during the handshake. Implementations
/// must be cheap to share across tasks (`Send + Sync + 'static`).
///
/// # Example
///
/// ```rust
/// use quadra_session::{Authenticator, Identity, SessionError};
/// use quadra_protocol::PlayerId;
///
/// /// Accepts any numeric token and uses it as the player id.
/// /// Development only.
/// struct DevAuthenticator;
///
/// impl Authenticator for DevAuthenticator {
///     async fn authenticate(
///         &self,
///         token: &str,
///     ) -> Result<Identity, SessionError> {
///         let id: u64 = token.parse().map_err(|_| {
///             SessionError::AuthFailed("token must be a number".into())
///         })?;
///         Ok(Identity {
///             player_id: PlayerId(id),
///             display_name: format!("player-{id}"),
///         })
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates the given token.
    ///
    /// # Errors
    /// [`SessionError::AuthFailed`] if the token is invalid, expired,
    /// or rejected by the backing store.
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Identity, SessionError>> + Send;
}
