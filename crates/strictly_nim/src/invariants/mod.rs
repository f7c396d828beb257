//! First-class invariants for misère Nim.
//!
//! Invariants are logical properties that must hold throughout a round.
//! They are testable independently and double as postconditions of
//! [`MoveContract`](crate::MoveContract).

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples so sets compose by listing their members.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns every violation, not just the first.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($member:ident),+) => {
        impl<S, $($member),+> InvariantSet<S> for ($($member,)+)
        where
            $($member: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$member::holds(state) {
                        violations.push(InvariantViolation::new($member::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

pub mod alternating_turn;
pub mod history_consistent;
pub mod monotonic_piles;
pub mod terminal_iff_empty;

pub use alternating_turn::AlternatingTurnInvariant;
pub use history_consistent::HistoryConsistentInvariant;
pub use monotonic_piles::MonotonicPilesInvariant;
pub use terminal_iff_empty::TerminalIffEmptyInvariant;

/// All Nim invariants as a composable set.
pub type NimInvariants = (
    MonotonicPilesInvariant,
    HistoryConsistentInvariant,
    AlternatingTurnInvariant,
    TerminalIffEmptyInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Move, Participant, Piles, Round};

    #[test]
    fn test_invariant_set_holds_for_fresh_round() {
        let round = Round::new(Piles::from(vec![1, 3, 5, 7]), Participant::Human);
        assert!(NimInvariants::check_all(&round).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let round = Round::replay(
            Piles::from(vec![1, 3, 5, 7]),
            Participant::Automated,
            &[Move::new(3, 7), Move::new(2, 2), Move::new(0, 1)],
        )
        .unwrap();
        assert!(NimInvariants::check_all(&round).is_ok());
    }

    #[test]
    fn test_invariant_set_reports_every_violation() {
        let mut round = Round::replay(
            Piles::from(vec![3, 4]),
            Participant::Human,
            &[Move::new(0, 1)],
        )
        .unwrap();

        // An untracked take breaks the history bookkeeping only.
        round.state.piles.take(Move::new(1, 1));
        let violations = NimInvariants::check_all(&round).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].description, HistoryConsistentInvariant::description());
    }

    #[test]
    fn test_two_invariants_as_set() {
        let round = Round::new(Piles::from(vec![2, 2]), Participant::Human);

        type TwoInvariants = (MonotonicPilesInvariant, AlternatingTurnInvariant);
        assert!(TwoInvariants::check_all(&round).is_ok());
    }
}
