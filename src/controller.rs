//! Turn controller: the state machine between the human and the policy.
//!
//! The controller is synchronous. When the automated participant is due it
//! hands out an [`AutomatedTurnTicket`] instead of answering at once; whoever
//! drives the controller waits as long as it likes and then redeems the
//! ticket with [`TurnController::resolve_automated_turn`]. Tickets are tagged
//! with the game generation, so a ticket issued before a reset is recognized
//! and dropped instead of being applied to the new game.

use crate::policy::PolicyProvider;
use derive_more::Display;
use serde::Serialize;
use strictly_nim::{
    GameState, HistoryEntry, HistoryLog, Move, MoveError, Participant, Piles, Play, Round,
    RoundTransition, validate,
};
use tracing::{debug, error, info, instrument, warn};

/// Where the game stands, from the controller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum TurnState {
    /// Waiting for the human; may wait indefinitely.
    AwaitingHumanInput,
    /// The automated participant's move has been requested.
    AutomatedThinking,
    /// Terminal; only a reset leaves this state.
    GameOver,
}

/// Claim on one pending automated turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AutomatedTurnTicket {
    generation: u64,
    ply: usize,
}

impl AutomatedTurnTicket {
    /// Game generation the ticket was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of moves played when the ticket was issued.
    pub fn ply(&self) -> usize {
        self.ply
    }
}

/// What happened after a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Move applied; the human is next.
    AwaitingHuman(HistoryEntry),
    /// Move applied; the automated participant is next and must be scheduled.
    AutomatedScheduled {
        /// The recorded move.
        entry: HistoryEntry,
        /// Ticket to redeem once the delay has passed.
        ticket: AutomatedTurnTicket,
    },
    /// Move applied and the game is over.
    Finished {
        /// The recorded move.
        entry: HistoryEntry,
        /// The participant who did not take the last object.
        winner: Participant,
    },
    /// A ticket from an earlier game or turn was ignored.
    Discarded,
}

/// Errors surfaced by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TurnError {
    /// The move was rejected; nothing changed.
    #[display("Illegal move: {}", _0)]
    IllegalMove(MoveError),

    /// The policy broke its contract. Nothing was applied.
    #[display("Policy {policy} proposed {proposed:?} for piles {piles}: {reason}")]
    PolicyContractViolation {
        /// Name of the offending policy.
        policy: String,
        /// The snapshot the policy was shown.
        piles: Piles,
        /// What it answered.
        proposed: Option<Move>,
        /// Why the answer was refused.
        reason: String,
    },
}

impl std::error::Error for TurnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TurnError::IllegalMove(err) => Some(err),
            TurnError::PolicyContractViolation { .. } => None,
        }
    }
}

impl From<MoveError> for TurnError {
    fn from(err: MoveError) -> Self {
        TurnError::IllegalMove(err)
    }
}

/// Owns the current game and decides who moves next.
pub struct TurnController {
    round: Round,
    turn: TurnState,
    generation: u64,
    policy: Box<dyn PolicyProvider>,
}

impl std::fmt::Debug for TurnController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnController")
            .field("round", &self.round)
            .field("turn", &self.turn)
            .field("generation", &self.generation)
            .field("policy", &self.policy.name())
            .finish()
    }
}

impl TurnController {
    /// Creates a controller with a fresh game.
    ///
    /// When the automated participant moves first, fetch its ticket with
    /// [`pending_ticket`](Self::pending_ticket).
    #[instrument(skip(policy), fields(piles = %initial_piles, policy = policy.name()))]
    pub fn new(
        initial_piles: Piles,
        first_mover: Participant,
        policy: Box<dyn PolicyProvider>,
    ) -> Self {
        let round = Round::new(initial_piles, first_mover);
        let turn = Self::turn_for(&round);
        Self {
            round,
            turn,
            generation: 0,
            policy,
        }
    }

    /// Replaces the game wholesale and starts a new generation.
    ///
    /// Any ticket issued before the reset becomes stale. Returns the ticket
    /// for the opening automated turn, if the automated participant starts.
    #[instrument(skip(self), fields(piles = %initial_piles, generation = self.generation + 1))]
    pub fn reset(
        &mut self,
        initial_piles: Piles,
        first_mover: Participant,
    ) -> Option<AutomatedTurnTicket> {
        self.generation += 1;
        self.round = Round::new(initial_piles, first_mover);
        self.turn = Self::turn_for(&self.round);
        info!(first_mover = %first_mover, turn = %self.turn, "New game");
        self.pending_ticket()
    }

    /// Starts over with the same layout.
    ///
    /// After a finished game the winner opens the next one; otherwise the
    /// previous first mover does.
    #[instrument(skip(self))]
    pub fn restart(&mut self) -> Option<AutomatedTurnTicket> {
        let first_mover = self.round.winner().unwrap_or(self.round.first_mover());
        let layout = self.round.initial().clone();
        self.reset(layout, first_mover)
    }

    /// Applies a move submitted by the human.
    #[instrument(skip(self), fields(turn = %self.turn, generation = self.generation))]
    pub fn submit_human_move(&mut self, action: Move) -> Result<TurnOutcome, TurnError> {
        match self.turn {
            TurnState::GameOver => Err(MoveError::GameOver.into()),
            TurnState::AutomatedThinking => {
                Err(MoveError::NotYourTurn(Participant::Human).into())
            }
            TurnState::AwaitingHumanInput => {
                let transition = self
                    .round
                    .play(Play::new(Participant::Human, action))
                    .inspect_err(|err| warn!(error = %err, "Human move rejected"))?;
                Ok(self.advance(transition))
            }
        }
    }

    /// Redeems a ticket: asks the policy for a move and applies it.
    ///
    /// Tickets from an earlier generation, or for a turn that is no longer
    /// pending, are discarded without touching the game.
    #[instrument(skip(self), fields(turn = %self.turn, generation = self.generation))]
    pub fn resolve_automated_turn(
        &mut self,
        ticket: AutomatedTurnTicket,
    ) -> Result<TurnOutcome, TurnError> {
        if self.turn != TurnState::AutomatedThinking || ticket != self.ticket() {
            debug!(
                ticket_generation = ticket.generation,
                ticket_ply = ticket.ply,
                "Discarding stale automated turn"
            );
            return Ok(TurnOutcome::Discarded);
        }

        let snapshot = self.round.state().piles().clone();
        let proposed = self.policy.choose_action(&snapshot, false);

        let action = match proposed {
            Some(action) => action,
            None => return Err(self.violation(snapshot, None, "no move proposed".to_string())),
        };
        if let Err(err) = validate(&snapshot, action.pile(), action.count()) {
            return Err(self.violation(snapshot, Some(action), err.to_string()));
        }

        debug!(%action, "Automated move chosen");
        let transition = self.round.play(Play::new(Participant::Automated, action))?;
        Ok(self.advance(transition))
    }

    /// Ticket for the current automated turn, if one is pending.
    pub fn pending_ticket(&self) -> Option<AutomatedTurnTicket> {
        (self.turn == TurnState::AutomatedThinking).then(|| self.ticket())
    }

    /// Current turn state.
    pub fn turn(&self) -> TurnState {
        self.turn
    }

    /// Live game state.
    pub fn state(&self) -> &GameState {
        self.round.state()
    }

    /// Read-only pile snapshot.
    pub fn piles(&self) -> &Piles {
        self.round.state().piles()
    }

    /// Participant to move (or the last mover, once over).
    pub fn active_player(&self) -> Participant {
        self.round.state().active_player()
    }

    /// Moves of the current game.
    pub fn history(&self) -> &HistoryLog {
        self.round.history()
    }

    /// Winner of the current game, once it is over.
    pub fn winner(&self) -> Option<Participant> {
        self.round.winner()
    }

    /// Who opened the current game.
    pub fn first_mover(&self) -> Participant {
        self.round.first_mover()
    }

    /// Layout the current game started from.
    pub fn initial_piles(&self) -> &Piles {
        self.round.initial()
    }

    /// Number of resets so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Name of the automated participant's policy.
    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    fn ticket(&self) -> AutomatedTurnTicket {
        AutomatedTurnTicket {
            generation: self.generation,
            ply: self.round.history().len(),
        }
    }

    fn turn_for(round: &Round) -> TurnState {
        if round.is_over() {
            TurnState::GameOver
        } else {
            match round.state().active_player() {
                Participant::Human => TurnState::AwaitingHumanInput,
                Participant::Automated => TurnState::AutomatedThinking,
            }
        }
    }

    fn advance(&mut self, transition: RoundTransition) -> TurnOutcome {
        self.turn = Self::turn_for(&self.round);
        let outcome = match transition {
            RoundTransition::Finished { entry, winner } => {
                info!(%entry, winner = %winner, "Game over");
                TurnOutcome::Finished { entry, winner }
            }
            RoundTransition::Continue(entry) => match self.turn {
                TurnState::AutomatedThinking => TurnOutcome::AutomatedScheduled {
                    entry,
                    ticket: self.ticket(),
                },
                _ => TurnOutcome::AwaitingHuman(entry),
            },
        };
        debug!(turn = %self.turn, piles = %self.round.state().piles(), "Turn advanced");
        outcome
    }

    fn violation(&self, piles: Piles, proposed: Option<Move>, reason: String) -> TurnError {
        error!(
            policy = self.policy.name(),
            piles = %piles,
            ?proposed,
            reason = %reason,
            "Policy contract violation"
        );
        TurnError::PolicyContractViolation {
            policy: self.policy.name().to_string(),
            piles,
            proposed,
            reason,
        }
    }
}
