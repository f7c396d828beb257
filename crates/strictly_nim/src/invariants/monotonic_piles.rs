//! Monotonic piles invariant: piles only ever shrink.

use super::super::Round;
use super::Invariant;

/// Invariant: the layout keeps its shape and no pile grows past its start.
pub struct MonotonicPilesInvariant;

impl Invariant<Round> for MonotonicPilesInvariant {
    fn holds(round: &Round) -> bool {
        let initial = round.initial();
        let current = round.state().piles();

        initial.len() == current.len()
            && initial
                .iter()
                .zip(current.iter())
                .all(|(start, now)| now <= start)
    }

    fn description() -> &'static str {
        "Piles keep their number and never grow"
    }
}
