//! History consistency invariant: the log explains every missing object.

use super::super::Round;
use super::Invariant;

/// Invariant: replaying the log over the initial layout yields the current piles.
///
/// Sequence numbers run 1, 2, 3, ... with no gaps, and every entry took
/// at least one object.
pub struct HistoryConsistentInvariant;

impl Invariant<Round> for HistoryConsistentInvariant {
    fn holds(round: &Round) -> bool {
        let mut expected: Vec<u64> = round.initial().iter().map(u64::from).collect();

        for (i, entry) in round.history().entries().enumerate() {
            if entry.sequence != i + 1 || entry.count == 0 {
                return false;
            }
            match expected.get_mut(entry.pile) {
                Some(left) if *left >= u64::from(entry.count) => *left -= u64::from(entry.count),
                _ => return false,
            }
        }

        let current = round.state().piles();
        expected.len() == current.len()
            && expected
                .iter()
                .zip(current.iter())
                .all(|(&want, have)| want == u64::from(have))
    }

    fn description() -> &'static str {
        "History accounts for every object taken"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HistoryEntry, Move, Participant, Piles};

    #[test]
    fn test_empty_round_holds() {
        let round = Round::new(Piles::from(vec![1, 3, 5, 7]), Participant::Human);
        assert!(HistoryConsistentInvariant::holds(&round));
    }

    #[test]
    fn test_multiple_moves_hold() {
        let round = Round::replay(
            Piles::from(vec![1, 3, 5, 7]),
            Participant::Human,
            &[Move::new(3, 2), Move::new(3, 1), Move::new(1, 3)],
        )
        .unwrap();
        assert!(HistoryConsistentInvariant::holds(&round));
        assert_eq!(round.history().len(), 3);
    }

    #[test]
    fn test_untracked_take_violates() {
        let mut round = Round::new(Piles::from(vec![3, 4]), Participant::Human);
        round.state.piles.take(Move::new(0, 1));
        assert!(!HistoryConsistentInvariant::holds(&round));
    }

    #[test]
    fn test_sequence_gap_violates() {
        let mut round = Round::new(Piles::from(vec![3, 4]), Participant::Human);
        round.state.piles.take(Move::new(0, 1));
        round.history.push_unchecked(HistoryEntry {
            actor: Participant::Human,
            pile: 0,
            count: 1,
            sequence: 2,
        });
        assert!(!HistoryConsistentInvariant::holds(&round));
    }
}
