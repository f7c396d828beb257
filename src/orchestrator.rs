//! Async driver around the [`TurnController`].
//!
//! The orchestrator owns the controller and serializes everything that can
//! touch it: human moves, new-game requests and the delayed automated turn
//! all arrive as messages on one channel. The automated turn is a spawned
//! sleeper that posts its ticket back after the configured delay; resets
//! abort the sleeper, and a ticket that slips through anyway is discarded
//! by the controller's generation check.

use crate::controller::{AutomatedTurnTicket, TurnController, TurnError, TurnOutcome};
use anyhow::{Result, anyhow};
use serde::Serialize;
use std::time::Duration;
use strictly_nim::{GameState, HistoryEntry, Move, Participant, Piles};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Messages sent from the orchestrator to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A game started (or restarted).
    NewGame {
        /// Fresh state.
        state: GameState,
        /// Who opens.
        first_mover: Participant,
        /// Generation of the new game.
        generation: u64,
    },
    /// The automated participant's move is due after the delay.
    AutomatedThinking {
        /// Generation the pending move belongs to.
        generation: u64,
    },
    /// A move was applied.
    MoveMade {
        /// The recorded move.
        entry: HistoryEntry,
        /// State after the move.
        state: GameState,
    },
    /// A human move was refused; nothing changed.
    MoveRejected {
        /// Why.
        reason: String,
    },
    /// The game ended.
    GameOver {
        /// The participant who did not take the last object.
        winner: Participant,
        /// Final state.
        state: GameState,
    },
    /// The policy broke its contract; the orchestrator stops.
    PolicyFault {
        /// What went wrong.
        reason: String,
    },
}

/// Requests accepted from the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit a human move.
    SubmitMove(Move),
    /// Start a new game; `piles` defaults to the current layout.
    NewGame {
        /// Layout for the new game.
        piles: Option<Piles>,
        /// Who opens.
        first_mover: Participant,
    },
    /// Start over with the same layout, winner first.
    Restart,
    /// Stop the orchestrator.
    Shutdown,
}

#[derive(Debug)]
enum Message {
    Command(Command),
    AutomatedTurn(AutomatedTurnTicket),
}

/// Cloneable handle for sending commands to a running [`Orchestrator`].
///
/// The orchestrator stops once every handle is dropped.
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    tx: mpsc::UnboundedSender<Message>,
}

impl OrchestratorHandle {
    /// Sends a raw command.
    pub fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(Message::Command(command))
            .map_err(|_| anyhow!("Orchestrator has stopped"))
    }

    /// Submits a human move.
    pub fn submit_move(&self, action: Move) -> Result<()> {
        self.send(Command::SubmitMove(action))
    }

    /// Starts a new game on the current layout.
    pub fn new_game(&self, first_mover: Participant) -> Result<()> {
        self.send(Command::NewGame {
            piles: None,
            first_mover,
        })
    }

    /// Restarts with the same layout.
    pub fn restart(&self) -> Result<()> {
        self.send(Command::Restart)
    }

    /// Asks the orchestrator to stop.
    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }
}

/// Runs games between the human (via commands) and the policy.
pub struct Orchestrator {
    controller: TurnController,
    delay: Duration,
    events: mpsc::UnboundedSender<GameEvent>,
    inbox: mpsc::UnboundedReceiver<Message>,
    outbox: mpsc::WeakUnboundedSender<Message>,
    pending: Option<JoinHandle<()>>,
}

impl Orchestrator {
    /// Creates an orchestrator and the handle used to drive it.
    pub fn new(
        controller: TurnController,
        delay: Duration,
        events: mpsc::UnboundedSender<GameEvent>,
    ) -> (Self, OrchestratorHandle) {
        let (tx, inbox) = mpsc::unbounded_channel();
        let orchestrator = Self {
            controller,
            delay,
            events,
            inbox,
            outbox: tx.downgrade(),
            pending: None,
        };
        (orchestrator, OrchestratorHandle { tx })
    }

    /// Processes messages until shutdown, returning the controller.
    ///
    /// Fails if the policy breaks its contract or the UI stops listening.
    #[instrument(skip(self), fields(policy = self.controller.policy_name(), delay_ms = self.delay.as_millis() as u64))]
    pub async fn run(mut self) -> Result<TurnController> {
        info!("Starting game orchestration");
        self.announce_new_game(self.controller.pending_ticket())?;

        while let Some(message) = self.inbox.recv().await {
            match message {
                Message::Command(Command::Shutdown) => {
                    info!("Shutdown requested");
                    break;
                }
                Message::Command(command) => self.handle_command(command)?,
                Message::AutomatedTurn(ticket) => self.handle_automated_turn(ticket)?,
            }
        }

        self.cancel_pending();
        info!(generation = self.controller.generation(), "Orchestration stopped");
        Ok(self.controller)
    }

    fn handle_command(&mut self, command: Command) -> Result<()> {
        debug!(?command, "Command received");
        match command {
            Command::SubmitMove(action) => match self.controller.submit_human_move(action) {
                Ok(outcome) => self.publish(outcome),
                Err(err) => self.emit(GameEvent::MoveRejected {
                    reason: err.to_string(),
                }),
            },
            Command::NewGame { piles, first_mover } => {
                self.cancel_pending();
                let piles = piles.unwrap_or_else(|| self.controller.initial_piles().clone());
                let ticket = self.controller.reset(piles, first_mover);
                self.announce_new_game(ticket)
            }
            Command::Restart => {
                self.cancel_pending();
                let ticket = self.controller.restart();
                self.announce_new_game(ticket)
            }
            Command::Shutdown => Ok(()),
        }
    }

    fn handle_automated_turn(&mut self, ticket: AutomatedTurnTicket) -> Result<()> {
        self.pending = None;
        match self.controller.resolve_automated_turn(ticket) {
            Ok(outcome) => self.publish(outcome),
            Err(err @ TurnError::PolicyContractViolation { .. }) => {
                error!(error = %err, "Stopping after policy fault");
                self.emit(GameEvent::PolicyFault {
                    reason: err.to_string(),
                })?;
                Err(err.into())
            }
            Err(err) => {
                error!(error = %err, "Automated move failed");
                Err(err.into())
            }
        }
    }

    fn announce_new_game(&mut self, ticket: Option<AutomatedTurnTicket>) -> Result<()> {
        self.emit(GameEvent::NewGame {
            state: self.controller.state().clone(),
            first_mover: self.controller.first_mover(),
            generation: self.controller.generation(),
        })?;
        match ticket {
            Some(ticket) => self.schedule(ticket),
            None => Ok(()),
        }
    }

    fn publish(&mut self, outcome: TurnOutcome) -> Result<()> {
        match outcome {
            TurnOutcome::AwaitingHuman(entry) => self.emit_move(entry),
            TurnOutcome::AutomatedScheduled { entry, ticket } => {
                self.emit_move(entry)?;
                self.schedule(ticket)
            }
            TurnOutcome::Finished { entry, winner } => {
                self.emit_move(entry)?;
                self.emit(GameEvent::GameOver {
                    winner,
                    state: self.controller.state().clone(),
                })
            }
            TurnOutcome::Discarded => {
                debug!("Stale automated turn ignored");
                Ok(())
            }
        }
    }

    fn emit_move(&self, entry: HistoryEntry) -> Result<()> {
        info!("{}", entry);
        self.emit(GameEvent::MoveMade {
            entry,
            state: self.controller.state().clone(),
        })
    }

    fn emit(&self, event: GameEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| anyhow!("Event receiver dropped"))
    }

    /// Spawns the sleeper that posts `ticket` back after the delay.
    fn schedule(&mut self, ticket: AutomatedTurnTicket) -> Result<()> {
        self.cancel_pending();
        self.emit(GameEvent::AutomatedThinking {
            generation: ticket.generation(),
        })?;

        let outbox = self.outbox.clone();
        let delay = self.delay;
        debug!(generation = ticket.generation(), ply = ticket.ply(), "Automated turn scheduled");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Nothing to do if the orchestrator is gone.
            if let Some(tx) = outbox.upgrade() {
                if tx.send(Message::AutomatedTurn(ticket)).is_err() {
                    warn!("Orchestrator stopped before the automated turn fired");
                }
            }
        }));
        Ok(())
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!("Cancelling pending automated turn");
            handle.abort();
        }
    }
}
