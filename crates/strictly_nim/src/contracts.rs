//! Contract-based validation for misère Nim.
//!
//! Contracts define correctness through preconditions and postconditions.
//! They formalize the Hoare-style reasoning: {P} action {Q}

use super::action::{Move, MoveError, Play};
use super::invariants::{InvariantSet, NimInvariants};
use super::round::Round;
use super::Piles;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
///
/// - Precondition: {P(state, action)} - must hold before applying action
/// - Postcondition: {Q(before, after)} - must hold after applying action
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the pile index must exist.
pub struct PileInRange;

impl PileInRange {
    /// Checks the pile index against the number of piles.
    pub fn check(piles: &Piles, mov: &Move) -> Result<(), MoveError> {
        if mov.pile() >= piles.len() {
            Err(MoveError::PileOutOfRange {
                index: mov.pile(),
                len: piles.len(),
            })
        } else {
            Ok(())
        }
    }
}

/// Precondition: at least one object must be taken.
pub struct PositiveCount;

impl PositiveCount {
    /// Rejects empty takes.
    pub fn check(mov: &Move) -> Result<(), MoveError> {
        if mov.count() == 0 {
            Err(MoveError::NonPositiveCount)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the pile must hold at least `count` objects.
pub struct WithinPile;

impl WithinPile {
    /// Compares the requested count with what is left. Assumes the index is in range.
    pub fn check(piles: &Piles, mov: &Move) -> Result<(), MoveError> {
        let available = piles.get(mov.pile()).unwrap_or(0);
        if mov.count() > available {
            Err(MoveError::CountExceedsPile {
                index: mov.pile(),
                requested: mov.count(),
                available,
            })
        } else {
            Ok(())
        }
    }
}

/// Composite precondition: a move is legal for a pile snapshot.
///
/// Reasons are reported in a fixed order: index, count, pile size.
pub struct LegalMove;

impl LegalMove {
    /// Validates all pile-level preconditions for a move.
    pub fn check(piles: &Piles, mov: &Move) -> Result<(), MoveError> {
        PileInRange::check(piles, mov)?;
        PositiveCount::check(mov)?;
        WithinPile::check(piles, mov)?;
        Ok(())
    }
}

/// Pure move validation over a pile snapshot.
///
/// Reads only, so it can be called from anywhere without coordination.
#[instrument(level = "debug", skip(piles), fields(piles = %piles))]
pub fn validate(piles: &Piles, pile_index: usize, count: u32) -> Result<(), MoveError> {
    LegalMove::check(piles, &Move::new(pile_index, count))
}

/// Precondition: the round must not be over.
pub struct RoundNotOver;

impl RoundNotOver {
    /// Rejects plays on a terminal state.
    pub fn check(round: &Round) -> Result<(), MoveError> {
        if round.is_over() {
            Err(MoveError::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the submitting participant must be the active one.
pub struct ParticipantsTurn;

impl ParticipantsTurn {
    /// Compares the actor with the state's active player.
    pub fn check(play: &Play, round: &Round) -> Result<(), MoveError> {
        if play.actor != round.state().active_player() {
            Err(MoveError::NotYourTurn(play.actor))
        } else {
            Ok(())
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for plays on a [`Round`].
///
/// Preconditions:
/// - Round is not over
/// - Submitter is the active participant
/// - Move is legal for the current piles
///
/// Postconditions:
/// - Exactly one pile shrank, by exactly the recorded count
/// - All [`NimInvariants`] hold
pub struct MoveContract;

impl Contract<Round, Play> for MoveContract {
    fn pre(round: &Round, play: &Play) -> Result<(), MoveError> {
        RoundNotOver::check(round)?;
        ParticipantsTurn::check(play, round)?;
        LegalMove::check(round.state().piles(), &play.action)
    }

    fn post(before: &Round, after: &Round) -> Result<(), MoveError> {
        SingleDecrement::check(before, after)?;

        NimInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}

/// Postcondition: the last recorded move is the only difference between two rounds.
struct SingleDecrement;

impl SingleDecrement {
    fn check(before: &Round, after: &Round) -> Result<(), MoveError> {
        let Some(entry) = after.history().last() else {
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: no move recorded".to_string(),
            ));
        };

        let old = before.state().piles();
        let new = after.state().piles();
        let consistent = old.len() == new.len()
            && old.iter().zip(new.iter()).enumerate().all(|(i, (o, n))| {
                if i == entry.pile {
                    o.checked_sub(entry.count) == Some(n)
                } else {
                    o == n
                }
            });

        if consistent {
            Ok(())
        } else {
            warn!(before = %old, after = %new, pile = entry.pile, count = entry.count, "Pile delta mismatch");
            Err(MoveError::InvariantViolation(format!(
                "Postcondition failed: {} -> {} is not a single take of {} from pile {}",
                old, new, entry.count, entry.pile
            )))
        }
    }
}
