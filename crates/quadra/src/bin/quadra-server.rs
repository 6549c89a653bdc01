//! Standalone Quadra server binary.
//!
//! Start it, point browser clients at `ws://<addr>`, play. The dev
//! authenticator accepts any numeric token as a player id, so this is
//! for local play and development only — put a real [`Authenticator`]
//! in front of it before exposing it anywhere.

use quadra::prelude::*;
use tracing_subscriber::EnvFilter;

/// Accepts any numeric token and uses it as the player id.
struct DevAuthenticator;

impl Authenticator for DevAuthenticator {
    async fn authenticate(
        &self,
        token: &str,
    ) -> Result<Identity, SessionError> {
        let id: u64 = token.parse().map_err(|_| {
            SessionError::AuthFailed("token must be a number".into())
        })?;
        Ok(Identity {
            player_id: PlayerId(id),
            display_name: format!("player-{id}"),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("QUADRA_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let server = QuadraServerBuilder::new()
        .bind(&addr)
        .build(DevAuthenticator)
        .await?;

    tracing::info!(%addr, "quadra server listening");
    server.run().await?;
    Ok(())
}
