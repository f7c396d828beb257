//! First-class action types for misère Nim.
//!
//! Moves are domain events, not side effects. They carry the intent
//! (which pile, how many) and can be validated independently of execution.

use super::Participant;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A move: take `count` objects from the pile at `pile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pile: usize,
    count: u32,
}

impl Move {
    /// Creates a new move.
    #[instrument(level = "trace")]
    pub fn new(pile: usize, count: u32) -> Self {
        Self { pile, count }
    }

    /// Index of the targeted pile.
    pub fn pile(&self) -> usize {
        self.pile
    }

    /// Number of objects taken.
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "take {} from pile {}", self.count, self.pile)
    }
}

/// A move attributed to the participant submitting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Play {
    /// Who submits the move.
    pub actor: Participant,
    /// The move itself.
    pub action: Move,
}

impl Play {
    /// Creates a new play.
    pub fn new(actor: Participant, action: Move) -> Self {
        Self { actor, action }
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The pile index does not exist.
    #[display("Pile {index} does not exist (there are {len} piles)")]
    PileOutOfRange {
        /// Requested pile.
        index: usize,
        /// Number of piles.
        len: usize,
    },

    /// Zero objects requested.
    #[display("Must take at least one object")]
    NonPositiveCount,

    /// More objects requested than the pile holds.
    #[display("Cannot take {requested} from pile {index}: only {available} left")]
    CountExceedsPile {
        /// Targeted pile.
        index: usize,
        /// Requested count.
        requested: u32,
        /// Objects left in the pile.
        available: u32,
    },

    /// The submitter is not the active participant.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(Participant),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_display() {
        assert_eq!(Move::new(2, 3).to_string(), "take 3 from pile 2");
    }

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = MoveError::CountExceedsPile {
            index: 1,
            requested: 1,
            available: 0,
        };
        assert_eq!(err.to_string(), "Cannot take 1 from pile 1: only 0 left");
        assert_eq!(
            MoveError::NotYourTurn(Participant::Human).to_string(),
            "It's not Human's turn"
        );
    }
}
