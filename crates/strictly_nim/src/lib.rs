//! Pure game logic for misère Nim.
//!
//! Everything in this crate is synchronous and free of I/O. A [`Round`] is
//! one game from reset to terminal: it owns the [`GameState`] and the
//! [`HistoryLog`], and every move goes through the [`MoveContract`]
//! (validation before mutation, invariant checks after it).
//!
//! # Example
//!
//! ```
//! use strictly_nim::{Move, Participant, Piles, Play, Round, RoundTransition};
//!
//! let mut round = Round::new(Piles::from(vec![1, 1]), Participant::Human);
//! round.play(Play::new(Participant::Human, Move::new(0, 1))).unwrap();
//!
//! // Misère: whoever empties the last pile loses.
//! match round.play(Play::new(Participant::Automated, Move::new(1, 1))).unwrap() {
//!     RoundTransition::Finished { winner, .. } => assert_eq!(winner, Participant::Human),
//!     RoundTransition::Continue(_) => unreachable!(),
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod history;
pub mod invariants;
mod round;
pub mod rules;
mod state;
mod types;

pub use action::{Move, MoveError, Play};
pub use contracts::{
    Contract, LegalMove, MoveContract, ParticipantsTurn, PileInRange, PositiveCount, RoundNotOver,
    WithinPile, validate,
};
pub use history::{HistoryEntry, HistoryLog};
pub use invariants::{Invariant, InvariantSet, InvariantViolation, NimInvariants};
pub use round::{Round, RoundTransition};
pub use state::GameState;
pub use types::{Participant, ParsePilesError, Piles};
