//! Misère termination rule: whoever empties the last pile loses.

use super::super::{Participant, Piles};
use tracing::{debug, instrument};

/// Returns true when no objects are left.
pub fn is_exhausted(piles: &Piles) -> bool {
    piles.is_exhausted()
}

/// Evaluates piles right after `last_mover` played.
///
/// Returns the winner once every pile is empty. Under misère play the
/// mover who took the last object loses, so the winner is always the
/// opponent of `last_mover`. Must be called before the turn passes.
#[instrument(level = "debug", fields(piles = %piles))]
pub fn evaluate(piles: &Piles, last_mover: Participant) -> Option<Participant> {
    if !is_exhausted(piles) {
        return None;
    }

    let winner = last_mover.opponent();
    debug!(loser = %last_mover, winner = %winner, "Last object taken");
    Some(winner)
}

/// Returns true if the participant about to move loses against perfect play.
///
/// Bouton's misère analysis: while some pile holds two or more objects the
/// position is lost iff the nim-sum is zero; once every pile holds at most
/// one object it is lost iff an odd number of single objects remain.
pub fn is_losing_position(piles: &Piles) -> bool {
    let has_large_pile = piles.iter().any(|count| count > 1);
    if has_large_pile {
        piles.iter().fold(0, |acc, count| acc ^ count) == 0
    } else {
        piles.iter().filter(|&count| count == 1).count() % 2 == 1
    }
}
