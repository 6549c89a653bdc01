//! Match actor: an isolated Tokio task that owns one game session.
//!
//! Each match runs in its own task, communicating with the outside
//! world through an mpsc channel. The channel is the match's
//! serialization point: commands are applied one at a time, in arrival
//! order, so concurrent players can never observe a half-applied move.

use std::collections::HashMap;

use quadra_engine::{GameSession, MoveStatus, Phase, PlayerId, Symbol};
use quadra_protocol::{GameCommand, GameEvent, MatchId, Recipient};
use tokio::sync::{mpsc, oneshot};

use crate::{MatchConfig, MatchError};

/// Channel sender for delivering game events to a player's connection
/// handler.
pub type PlayerSender = mpsc::UnboundedSender<GameEvent>;

/// Commands sent to a match actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel: the
/// caller sends a command and waits for the response on it.
pub(crate) enum MatchCommand {
    /// Add a player to the match.
    Join {
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<Symbol, MatchError>>,
    },

    /// Remove a player from the match (leave or disconnect).
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), MatchError>>,
    },

    /// Deliver a game command from a player.
    Command {
        player_id: PlayerId,
        command: GameCommand,
    },

    /// Request the current match metadata.
    Info {
        reply: oneshot::Sender<MatchInfo>,
    },

    /// Shut down the match.
    Shutdown,
}

/// A snapshot of match metadata (not the board itself).
#[derive(Debug, Clone)]
pub struct MatchInfo {
    /// The match's unique ID.
    pub match_id: MatchId,
    /// Current game phase.
    pub phase: Phase,
    /// Number of players currently in the match.
    pub player_count: usize,
}

impl MatchInfo {
    /// Returns `true` if the match is still accepting players.
    pub fn is_joinable(&self) -> bool {
        self.phase == Phase::Formation && self.player_count < 2
    }
}

/// Handle to a running match actor. Used to send commands to it.
///
/// Cheap to clone — just an `mpsc::Sender` wrapper. The
/// `MatchManager` holds one of these per match.
#[derive(Clone)]
pub struct MatchHandle {
    match_id: MatchId,
    sender: mpsc::Sender<MatchCommand>,
}

impl MatchHandle {
    /// Returns the match's unique ID.
    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Sends a join request to the match and waits for the assigned
    /// symbol.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<Symbol, MatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::Join {
                player_id,
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))?;
        reply_rx
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))?
    }

    /// Sends a leave request to the match.
    pub async fn leave(
        &self,
        player_id: PlayerId,
    ) -> Result<(), MatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))?;
        reply_rx
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))?
    }

    /// Sends a game command to the match (fire-and-forget; outcomes
    /// come back as [`GameEvent`]s on the player senders).
    pub async fn send_command(
        &self,
        player_id: PlayerId,
        command: GameCommand,
    ) -> Result<(), MatchError> {
        self.sender
            .send(MatchCommand::Command { player_id, command })
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))
    }

    /// Requests the current match info.
    pub async fn info(&self) -> Result<MatchInfo, MatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(MatchCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))?;
        reply_rx
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))
    }

    /// Tells the match to shut down.
    pub async fn shutdown(&self) -> Result<(), MatchError> {
        self.sender
            .send(MatchCommand::Shutdown)
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))
    }
}

/// The internal match actor state. Runs inside a Tokio task.
struct MatchActor {
    match_id: MatchId,
    session: GameSession,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<MatchCommand>,
}

impl MatchActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(match_id = %self.match_id, "match actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                MatchCommand::Join {
                    player_id,
                    name,
                    sender,
                    reply,
                } => {
                    let result =
                        self.handle_join(player_id, &name, sender);
                    let _ = reply.send(result);
                }
                MatchCommand::Leave { player_id, reply } => {
                    let result = self.handle_leave(player_id);
                    let _ = reply.send(result);
                }
                MatchCommand::Command { player_id, command } => {
                    self.handle_command(player_id, command);
                }
                MatchCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                MatchCommand::Shutdown => {
                    tracing::info!(
                        match_id = %self.match_id,
                        "match shutting down"
                    );
                    break;
                }
            }
        }

        tracing::info!(match_id = %self.match_id, "match actor stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        name: &str,
        sender: PlayerSender,
    ) -> Result<Symbol, MatchError> {
        let symbol = self.session.add_player(player_id, name)?;
        self.senders.insert(player_id, sender);
        tracing::info!(
            match_id = %self.match_id,
            %player_id,
            %symbol,
            players = self.session.player_count(),
            "player joined"
        );

        self.dispatch(vec![(
            Recipient::All,
            GameEvent::PlayerJoined {
                player_id,
                name: name.to_owned(),
                symbol,
            },
        )]);

        Ok(symbol)
    }

    /// Removes a player, with the phase deciding what that means:
    /// during `Formation` the slot and symbol are freed; once
    /// `InProgress` the game ends and the remaining player wins by
    /// forfeit.
    fn handle_leave(
        &mut self,
        player_id: PlayerId,
    ) -> Result<(), MatchError> {
        if self.senders.remove(&player_id).is_none() {
            return Err(MatchError::NotInMatch(player_id));
        }

        tracing::info!(
            match_id = %self.match_id,
            %player_id,
            "player left"
        );

        match self.session.phase() {
            Phase::Formation => {
                self.session.remove_player(player_id)?;
                self.dispatch(vec![(
                    Recipient::All,
                    GameEvent::PlayerLeft { player_id },
                )]);
            }
            Phase::InProgress => {
                let winner = self.session.forfeit(player_id)?;
                tracing::info!(
                    match_id = %self.match_id,
                    %winner,
                    "game forfeited"
                );
                self.dispatch(vec![(
                    Recipient::All,
                    GameEvent::GameOver {
                        winner: Some(winner),
                        reason: "forfeit".into(),
                    },
                )]);
            }
            // Leaving a finished game drops the sender, nothing else.
            Phase::Completed => {}
        }

        Ok(())
    }

    fn handle_command(
        &mut self,
        player_id: PlayerId,
        command: GameCommand,
    ) {
        if !self.senders.contains_key(&player_id) {
            tracing::warn!(
                match_id = %self.match_id,
                %player_id,
                "command from non-member, ignoring"
            );
            return;
        }

        let events = match command {
            GameCommand::Start => self.apply_start(player_id),
            GameCommand::Drop { column } => {
                self.apply_drop(player_id, column)
            }
            GameCommand::QueryBoard => self.apply_query(player_id),
        };

        self.dispatch(events);
    }

    fn apply_start(
        &mut self,
        player_id: PlayerId,
    ) -> Vec<(Recipient, GameEvent)> {
        match self.session.start() {
            Ok(first) => {
                tracing::info!(
                    match_id = %self.match_id,
                    first_mover = %first,
                    "game started"
                );
                let view = self.session.snapshot();
                vec![
                    (Recipient::All, GameEvent::Started { turn: first }),
                    (
                        Recipient::All,
                        GameEvent::Board {
                            grid: view.grid,
                            phase: view.phase,
                            turn: view.turn,
                            winner: view.winner,
                        },
                    ),
                ]
            }
            Err(e) => reject(player_id, e),
        }
    }

    fn apply_drop(
        &mut self,
        player_id: PlayerId,
        column: usize,
    ) -> Vec<(Recipient, GameEvent)> {
        let report = match self.session.play(player_id, column) {
            Ok(report) => report,
            Err(e) => {
                tracing::debug!(
                    match_id = %self.match_id,
                    %player_id,
                    column,
                    error = %e,
                    "move rejected"
                );
                return reject(player_id, e);
            }
        };

        let mut events = vec![(
            Recipient::All,
            GameEvent::Moved {
                player_id,
                column: report.column,
                row: report.row,
                symbol: report.symbol,
            },
        )];

        match report.status {
            MoveStatus::Continuing => {}
            MoveStatus::Won => {
                tracing::info!(
                    match_id = %self.match_id,
                    winner = %player_id,
                    "game won"
                );
                events.push((
                    Recipient::All,
                    GameEvent::GameOver {
                        winner: report.winner,
                        reason: "four in a row".into(),
                    },
                ));
            }
            MoveStatus::Draw => {
                tracing::info!(
                    match_id = %self.match_id,
                    "game drawn"
                );
                events.push((
                    Recipient::All,
                    GameEvent::GameOver {
                        winner: None,
                        reason: "draw".into(),
                    },
                ));
            }
        }

        events
    }

    fn apply_query(
        &self,
        player_id: PlayerId,
    ) -> Vec<(Recipient, GameEvent)> {
        let view = self.session.snapshot();
        vec![(
            Recipient::Player(player_id),
            GameEvent::Board {
                grid: view.grid,
                phase: view.phase,
                turn: view.turn,
                winner: view.winner,
            },
        )]
    }

    /// Dispatches events to the correct recipients.
    fn dispatch(&self, events: Vec<(Recipient, GameEvent)>) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for sender in self.senders.values() {
                        let _ = sender.send(event.clone());
                    }
                }
                Recipient::Player(pid) => {
                    self.send_to(pid, event);
                }
            }
        }
    }

    /// Sends an event to a single player. Silently drops if the
    /// receiver is gone (player disconnected).
    fn send_to(&self, player_id: PlayerId, event: GameEvent) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(event);
        }
    }

    fn info(&self) -> MatchInfo {
        MatchInfo {
            match_id: self.match_id,
            phase: self.session.phase(),
            player_count: self.senders.len(),
        }
    }
}

/// A refused command becomes a `Rejected` event for the offender only.
/// Other players never see it and the board is unchanged.
fn reject(
    player_id: PlayerId,
    error: quadra_engine::EngineError,
) -> Vec<(Recipient, GameEvent)> {
    vec![(
        Recipient::Player(player_id),
        GameEvent::Rejected {
            message: error.to_string(),
        },
    )]
}

/// Spawns a new match actor task and returns a handle to communicate
/// with it.
pub(crate) fn spawn_match(
    match_id: MatchId,
    config: &MatchConfig,
) -> MatchHandle {
    let (tx, rx) = mpsc::channel(config.mailbox_size);

    let actor = MatchActor {
        match_id,
        session: GameSession::new(config.board.clone()),
        senders: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    MatchHandle {
        match_id,
        sender: tx,
    }
}
