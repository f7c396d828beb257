//! Live game state: piles, whose turn it is, and whether the game is over.

use super::action::{Move, MoveError};
use super::contracts::LegalMove;
use super::{rules, Participant, Piles};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Complete state of one game.
///
/// `terminal` holds exactly when every pile is empty. On a terminal state
/// `active_player` still names the participant who made the last move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) piles: Piles,
    active_player: Participant,
    terminal: bool,
}

impl GameState {
    /// Creates a state with the given layout and first mover.
    ///
    /// An already-exhausted layout starts terminal.
    #[instrument(fields(piles = %initial_piles))]
    pub fn new(initial_piles: Piles, first_mover: Participant) -> Self {
        let terminal = rules::is_exhausted(&initial_piles);
        Self {
            piles: initial_piles,
            active_player: first_mover,
            terminal,
        }
    }

    /// Replaces the whole state.
    #[instrument(skip(self), fields(piles = %initial_piles))]
    pub fn reset(&mut self, initial_piles: Piles, first_mover: Participant) {
        *self = Self::new(initial_piles, first_mover);
    }

    /// Applies a move and returns the new terminal status.
    ///
    /// The move should already have passed validation; it is checked again
    /// here and rejected without touching the state if it is illegal or the
    /// game is over. The active player only passes on when the game goes on.
    #[instrument(skip(self), fields(piles = %self.piles, mover = %self.active_player))]
    pub fn apply_move(&mut self, action: Move) -> Result<bool, MoveError> {
        if self.terminal {
            return Err(MoveError::GameOver);
        }
        LegalMove::check(&self.piles, &action)?;

        self.piles.take(action);
        self.terminal = rules::is_exhausted(&self.piles);
        if !self.terminal {
            self.active_player = self.active_player.opponent();
        }

        debug!(piles = %self.piles, terminal = self.terminal, "Move applied");
        Ok(self.terminal)
    }

    /// Returns the piles.
    pub fn piles(&self) -> &Piles {
        &self.piles
    }

    /// Returns the participant to move (or the last mover, once terminal).
    pub fn active_player(&self) -> Participant {
        self.active_player
    }

    /// Returns true once every pile is empty.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}
