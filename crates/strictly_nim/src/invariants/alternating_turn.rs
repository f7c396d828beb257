//! Alternating turn invariant: movers alternate from the first mover.

use super::super::Round;
use super::Invariant;

/// Invariant: participants alternate, starting with the round's first mover.
///
/// While the round is live the active player is whoever is due next; once
/// it is over the active player is the one who made the final move.
pub struct AlternatingTurnInvariant;

impl Invariant<Round> for AlternatingTurnInvariant {
    fn holds(round: &Round) -> bool {
        let history = round.history();

        let mut expected = round.first_mover();
        for entry in history.entries() {
            if entry.actor != expected {
                return false;
            }
            expected = expected.opponent();
        }

        let active = round.state().active_player();
        match history.last() {
            Some(last) if round.is_over() => active == last.actor,
            _ => active == expected,
        }
    }

    fn description() -> &'static str {
        "Participants alternate turns from the first mover"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HistoryEntry, Move, Participant, Piles};

    #[test]
    fn test_empty_round_holds() {
        let round = Round::new(Piles::from(vec![2, 2]), Participant::Automated);
        assert!(AlternatingTurnInvariant::holds(&round));
    }

    #[test]
    fn test_alternating_sequence_holds() {
        let round = Round::replay(
            Piles::from(vec![3, 4, 5]),
            Participant::Human,
            &[Move::new(0, 1), Move::new(1, 1), Move::new(2, 1)],
        )
        .unwrap();
        assert!(AlternatingTurnInvariant::holds(&round));
        assert_eq!(round.state().active_player(), Participant::Automated);
    }

    #[test]
    fn test_finished_round_holds() {
        let round = Round::replay(
            Piles::from(vec![1, 1]),
            Participant::Human,
            &[Move::new(0, 1), Move::new(1, 1)],
        )
        .unwrap();
        assert!(round.is_over());
        assert!(AlternatingTurnInvariant::holds(&round));
    }

    #[test]
    fn test_same_participant_twice_violates() {
        let mut round = Round::new(Piles::from(vec![3, 4]), Participant::Human);
        for (sequence, pile) in [(1, 0), (2, 1)] {
            round.history.push_unchecked(HistoryEntry {
                actor: Participant::Human,
                pile,
                count: 1,
                sequence,
            });
        }
        assert!(!AlternatingTurnInvariant::holds(&round));
    }
}
