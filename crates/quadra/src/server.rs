//! `QuadraServer` builder and accept loop.
//!
//! This is the entry point for running a Quadra game server. It ties
//! together all the layers: transport → protocol → session → match.

use std::sync::Arc;
use std::time::Duration;

use quadra_match::{MatchConfig, MatchManager};
use quadra_protocol::{Codec, JsonCodec};
use quadra_session::{Authenticator, SessionConfig, SessionManager};
use quadra_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::handler::handle_connection;
use crate::QuadraError;

/// The current protocol version. Clients must send this in their
/// handshake or be rejected.
pub const PROTOCOL_VERSION: u32 = 1;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
/// Interior mutability via `Mutex` where needed; per-match state lives
/// behind the match actors, so these locks are held only for routing.
pub(crate) struct ServerState<A: Authenticator, C: Codec> {
    pub(crate) sessions: Mutex<SessionManager>,
    pub(crate) matches: Mutex<MatchManager>,
    pub(crate) auth: A,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Quadra server.
///
/// # Example
///
/// ```rust,ignore
/// use quadra::prelude::*;
///
/// let server = QuadraServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .build(my_auth)
///     .await?;
/// server.run().await
/// ```
pub struct QuadraServerBuilder {
    bind_addr: String,
    session_config: SessionConfig,
    match_config: MatchConfig,
}

impl QuadraServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            session_config: SessionConfig::default(),
            match_config: MatchConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Sets the match configuration (board size, win length).
    pub fn match_config(mut self, config: MatchConfig) -> Self {
        self.match_config = config;
        self
    }

    /// Builds and starts the server with the given authenticator.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(
        self,
        auth: impl Authenticator,
    ) -> Result<QuadraServer<impl Authenticator, JsonCodec>, QuadraError>
    {
        let transport =
            WebSocketTransport::bind(&self.bind_addr).await?;

        // Sweep at the grace-period cadence so an abandoned session
        // outlives its grace by at most one more period.
        let sweep_interval = Duration::from_secs(
            self.session_config.reconnect_grace_secs.max(1),
        );

        let state = Arc::new(ServerState {
            sessions: Mutex::new(SessionManager::new(self.session_config)),
            matches: Mutex::new(MatchManager::new(self.match_config)),
            auth,
            codec: JsonCodec,
        });

        Ok(QuadraServer {
            transport,
            state,
            sweep_interval,
        })
    }
}

impl Default for QuadraServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Quadra game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct QuadraServer<A: Authenticator, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, C>>,
    sweep_interval: Duration,
}

impl<A, C> QuadraServer<A, C>
where
    A: Authenticator,
    C: Codec + Clone + 'static,
{
    /// Creates a new builder.
    pub fn builder() -> QuadraServerBuilder {
        QuadraServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections, performs the handshake, and spawns
    /// a handler task for each connected player. Runs until the process
    /// is terminated.
    pub async fn run(mut self) -> Result<(), QuadraError> {
        tracing::info!("Quadra server running");

        // Periodic session sweep: disconnected players who never
        // resume are expired and removed. Match membership is already
        // released by the handler's drop guard at disconnect time.
        {
            let state = Arc::clone(&self.state);
            let interval = self.sweep_interval;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                ticker.tick().await; // first tick is immediate
                loop {
                    ticker.tick().await;
                    let mut sessions = state.sessions.lock().await;
                    let expired = sessions.expire_stale();
                    sessions.cleanup_expired();
                    if !expired.is_empty() {
                        tracing::info!(
                            count = expired.len(),
                            "swept expired sessions"
                        );
                    }
                }
            });
        }

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection::<A, C>(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
