//! Per-connection handler: handshake, auth, and message routing.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. The flow is:
//!   1. Receive Handshake (or Resume) → validate version / token
//!   2. Authenticate → create or resume the session
//!   3. Send HandshakeAck → player is connected
//!   4. Spawn the event pump: match events → envelopes → socket
//!   5. Loop: receive envelopes → dispatch system or game commands

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use quadra_protocol::{
    Codec, Envelope, MatchListEntry, Payload, PlayerId, SystemMessage,
};
use quadra_session::Authenticator;
use quadra_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::{ServerState, PROTOCOL_VERSION};
use crate::QuadraError;

/// Drop guard that cleans up when the handler exits for any reason.
///
/// Leaving the match first means an abrupt socket loss mid-game is a
/// forfeit: the remaining player wins. The session then enters its
/// reconnection grace period. Since `Drop` is synchronous, the async
/// work runs in a fire-and-forget task.
struct SessionGuard<A: Authenticator, C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<A, C>>,
}

impl<A: Authenticator, C: Codec> Drop for SessionGuard<A, C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            {
                let mut matches = state.matches.lock().await;
                if matches.player_match(&player_id).is_some() {
                    let _ = matches.leave_match(player_id).await;
                }
            }
            let mut sessions = state.sessions.lock().await;
            let _ = sessions.disconnect(player_id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<A, C>>,
) -> Result<(), QuadraError>
where
    A: Authenticator,
    C: Codec,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let start = Instant::now();
    let seq = Arc::new(AtomicU64::new(1));

    // --- Step 1: Handshake ---
    let (player_id, display_name, reconnect_token) =
        perform_handshake(&conn, &state, &start).await?;

    tracing::info!(%conn_id, %player_id, "player authenticated");

    // Guard goes up before the ack send: if that send fails, the
    // session must still be disconnected or the player id stays
    // Connected forever and can never handshake again.
    let _guard = SessionGuard {
        player_id,
        state: Arc::clone(&state),
    };

    let ack = Envelope {
        seq: 0,
        timestamp: start.elapsed().as_millis() as u64,
        payload: Payload::System(SystemMessage::HandshakeAck {
            player_id,
            reconnect_token,
        }),
    };
    let ack_bytes = state.codec.encode(&ack)?;
    conn.send(&ack_bytes).await.map_err(QuadraError::Transport)?;

    // --- Step 2: Event pump ---
    // Match actors push GameEvents into this channel; the pump wraps
    // them in envelopes and writes to the socket on its own task, so a
    // broadcast never waits for this handler's recv loop.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let pump = {
        let conn = conn.clone();
        let state = Arc::clone(&state);
        let seq = Arc::clone(&seq);
        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                let envelope = Envelope {
                    seq: next_seq(&seq),
                    timestamp: start.elapsed().as_millis() as u64,
                    payload: Payload::Event(event),
                };
                let bytes = match state.codec.encode(&envelope) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::debug!(error = %e, "event encode failed");
                        continue;
                    }
                };
                if conn.send(&bytes).await.is_err() {
                    break;
                }
            }
        })
    };

    // --- Step 3: Message loop ---
    loop {
        let data = match tokio::time::timeout(
            Duration::from_secs(15),
            conn.recv(),
        )
        .await
        {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%player_id, "connection timed out");
                break;
            }
        };

        let envelope: Envelope = match state.codec.decode(&data) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(
                    %player_id, error = %e, "failed to decode envelope"
                );
                continue;
            }
        };

        match envelope.payload {
            Payload::System(sys_msg) => {
                let should_close = handle_system_message(
                    &conn,
                    &state,
                    player_id,
                    &display_name,
                    &event_tx,
                    sys_msg,
                    &seq,
                    &start,
                )
                .await?;
                if should_close {
                    break;
                }
            }
            Payload::Command(command) => {
                let result = state
                    .matches
                    .lock()
                    .await
                    .route_command(player_id, command)
                    .await;
                if let Err(e) = result {
                    send_error(
                        &conn,
                        &state.codec,
                        400,
                        &e.to_string(),
                        next_seq(&seq),
                        &start,
                    )
                    .await?;
                }
            }
            Payload::Event(_) => {
                tracing::debug!(
                    %player_id,
                    "client sent a server event, ignoring"
                );
            }
        }
    }

    pump.abort();
    // _guard drops here → match leave and session disconnect fire.
    Ok(())
}

/// Performs the initial handshake: receive Handshake or Resume,
/// validate, create or resume the session. Returns the player's id,
/// display name, and reconnection token; the caller sends the ack
/// after its cleanup guard is in place.
async fn perform_handshake<A, C>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<A, C>>,
    start: &Instant,
) -> Result<(PlayerId, String, String), QuadraError>
where
    A: Authenticator,
    C: Codec,
{
    let data = match tokio::time::timeout(
        Duration::from_secs(5),
        conn.recv(),
    )
    .await
    {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(QuadraError::Protocol(
                quadra_protocol::ProtocolError::InvalidMessage(
                    "connection closed before handshake".into(),
                ),
            ));
        }
        Ok(Err(e)) => return Err(QuadraError::Transport(e)),
        Err(_) => {
            return Err(QuadraError::Protocol(
                quadra_protocol::ProtocolError::InvalidMessage(
                    "handshake timed out".into(),
                ),
            ));
        }
    };

    let envelope: Envelope = state.codec.decode(&data)?;

    let (player_id, display_name, reconnect_token) = match envelope.payload
    {
        Payload::System(SystemMessage::Handshake { version, token }) => {
            if version != PROTOCOL_VERSION {
                send_error(
                    conn,
                    &state.codec,
                    400,
                    &format!(
                        "version mismatch: expected {PROTOCOL_VERSION}, got {version}"
                    ),
                    0,
                    start,
                )
                .await?;
                return Err(QuadraError::Protocol(
                    quadra_protocol::ProtocolError::InvalidMessage(
                        "protocol version mismatch".into(),
                    ),
                ));
            }

            let token_str = token.as_deref().unwrap_or("");
            let identity =
                match state.auth.authenticate(token_str).await {
                    Ok(identity) => identity,
                    Err(e) => {
                        send_error(
                            conn,
                            &state.codec,
                            401,
                            "unauthorized",
                            0,
                            start,
                        )
                        .await?;
                        return Err(QuadraError::Session(e));
                    }
                };

            let mut sessions = state.sessions.lock().await;
            match sessions.create(identity) {
                Ok(session) => (
                    session.player_id,
                    session.display_name.clone(),
                    session.reconnect_token.clone(),
                ),
                Err(e) => {
                    drop(sessions);
                    send_error(
                        conn,
                        &state.codec,
                        409,
                        &e.to_string(),
                        0,
                        start,
                    )
                    .await?;
                    return Err(QuadraError::Session(e));
                }
            }
        }

        Payload::System(SystemMessage::Resume { reconnect_token }) => {
            let mut sessions = state.sessions.lock().await;
            match sessions.reconnect(&reconnect_token) {
                Ok(session) => (
                    session.player_id,
                    session.display_name.clone(),
                    session.reconnect_token.clone(),
                ),
                Err(e) => {
                    drop(sessions);
                    send_error(
                        conn,
                        &state.codec,
                        401,
                        &e.to_string(),
                        0,
                        start,
                    )
                    .await?;
                    return Err(QuadraError::Session(e));
                }
            }
        }

        _ => {
            send_error(
                conn,
                &state.codec,
                400,
                "expected Handshake",
                0,
                start,
            )
            .await?;
            return Err(QuadraError::Protocol(
                quadra_protocol::ProtocolError::InvalidMessage(
                    "first message must be Handshake or Resume".into(),
                ),
            ));
        }
    };

    Ok((player_id, display_name, reconnect_token))
}

/// Handles a system message. Returns `true` if the connection should
/// close.
#[allow(clippy::too_many_arguments)]
async fn handle_system_message<A, C>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<A, C>>,
    player_id: PlayerId,
    display_name: &str,
    event_tx: &quadra_match::PlayerSender,
    msg: SystemMessage,
    seq: &AtomicU64,
    start: &Instant,
) -> Result<bool, QuadraError>
where
    A: Authenticator,
    C: Codec,
{
    match msg {
        SystemMessage::Heartbeat { client_time } => {
            let ack = Envelope {
                seq: next_seq(seq),
                timestamp: start.elapsed().as_millis() as u64,
                payload: Payload::System(SystemMessage::HeartbeatAck {
                    client_time,
                    server_time: start.elapsed().as_millis() as u64,
                }),
            };
            let bytes = state.codec.encode(&ack)?;
            conn.send(&bytes).await.map_err(QuadraError::Transport)?;
        }

        SystemMessage::JoinMatch { match_id } => {
            // Lock only for the join, drop before network I/O.
            let join_result = {
                let mut matches = state.matches.lock().await;
                matches
                    .join_match(
                        player_id,
                        display_name,
                        match_id,
                        event_tx.clone(),
                    )
                    .await
            };

            match join_result {
                Ok(_symbol) => {
                    let resp = Envelope {
                        seq: next_seq(seq),
                        timestamp: start.elapsed().as_millis() as u64,
                        payload: Payload::System(
                            SystemMessage::MatchJoined { match_id },
                        ),
                    };
                    let bytes = state.codec.encode(&resp)?;
                    conn.send(&bytes)
                        .await
                        .map_err(QuadraError::Transport)?;
                }
                Err(e) => {
                    send_error(
                        conn,
                        &state.codec,
                        404,
                        &e.to_string(),
                        next_seq(seq),
                        start,
                    )
                    .await?;
                }
            }
        }

        SystemMessage::QuickMatch => {
            let result = {
                let mut matches = state.matches.lock().await;
                matches
                    .quick_match(player_id, display_name, event_tx.clone())
                    .await
            };

            match result {
                Ok((match_id, _symbol)) => {
                    let resp = Envelope {
                        seq: next_seq(seq),
                        timestamp: start.elapsed().as_millis() as u64,
                        payload: Payload::System(
                            SystemMessage::MatchJoined { match_id },
                        ),
                    };
                    let bytes = state.codec.encode(&resp)?;
                    conn.send(&bytes)
                        .await
                        .map_err(QuadraError::Transport)?;
                }
                Err(e) => {
                    send_error(
                        conn,
                        &state.codec,
                        409,
                        &e.to_string(),
                        next_seq(seq),
                        start,
                    )
                    .await?;
                }
            }
        }

        SystemMessage::ListMatches => {
            let infos = state.matches.lock().await.list_matches().await;
            let entries: Vec<MatchListEntry> = infos
                .into_iter()
                .map(|info| MatchListEntry {
                    match_id: info.match_id,
                    phase: info.phase,
                    player_count: info.player_count,
                })
                .collect();

            let resp = Envelope {
                seq: next_seq(seq),
                timestamp: start.elapsed().as_millis() as u64,
                payload: Payload::System(SystemMessage::MatchList {
                    matches: entries,
                }),
            };
            let bytes = state.codec.encode(&resp)?;
            conn.send(&bytes).await.map_err(QuadraError::Transport)?;
        }

        SystemMessage::LeaveMatch => {
            let mut matches = state.matches.lock().await;
            if let Err(e) = matches.leave_match(player_id).await {
                tracing::debug!(
                    %player_id, error = %e, "leave match failed"
                );
            }
        }

        SystemMessage::Disconnect { reason } => {
            tracing::info!(%player_id, %reason, "client disconnected");
            return Ok(true);
        }

        _ => {
            tracing::debug!(
                %player_id, "ignoring unexpected system message"
            );
        }
    }

    Ok(false)
}

/// Sends a SystemMessage::Error envelope to the client.
async fn send_error(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    code: u16,
    message: &str,
    seq: u64,
    start: &Instant,
) -> Result<(), QuadraError> {
    let envelope = Envelope {
        seq,
        timestamp: start.elapsed().as_millis() as u64,
        payload: Payload::System(SystemMessage::Error {
            code,
            message: message.to_string(),
        }),
    };
    let bytes = codec.encode(&envelope)?;
    conn.send(&bytes).await.map_err(QuadraError::Transport)?;
    Ok(())
}

/// Claims and returns the next sequence number.
fn next_seq(seq: &AtomicU64) -> u64 {
    seq.fetch_add(1, Ordering::Relaxed)
}
