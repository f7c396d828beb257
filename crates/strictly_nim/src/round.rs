//! One game of misère Nim, from reset to terminal.

use super::action::{MoveError, Play};
use super::contracts::{Contract, MoveContract};
use super::history::{HistoryEntry, HistoryLog};
use super::state::GameState;
use super::{rules, Move, Participant, Piles};
use tracing::{info, instrument};

/// A single game: live state plus the log of how it got there.
///
/// Rounds are replaced wholesale on reset, never patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    initial: Piles,
    first_mover: Participant,
    pub(crate) state: GameState,
    pub(crate) history: HistoryLog,
    winner: Option<Participant>,
}

/// Result of a successful play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTransition {
    /// The game goes on with the other participant.
    Continue(HistoryEntry),
    /// The play emptied the last pile.
    Finished {
        /// The recorded play.
        entry: HistoryEntry,
        /// The participant who did *not* take the last object.
        winner: Participant,
    },
}

impl RoundTransition {
    /// The recorded play.
    pub fn entry(&self) -> HistoryEntry {
        match self {
            RoundTransition::Continue(entry) => *entry,
            RoundTransition::Finished { entry, .. } => *entry,
        }
    }
}

impl Round {
    /// Starts a round with an empty history.
    #[instrument(fields(piles = %initial))]
    pub fn new(initial: Piles, first_mover: Participant) -> Self {
        Self {
            state: GameState::new(initial.clone(), first_mover),
            initial,
            first_mover,
            history: HistoryLog::new(),
            winner: None,
        }
    }

    /// Plays a move for `play.actor`.
    ///
    /// Preconditions are always checked; postconditions only in debug
    /// builds. The round is updated only if every check passes.
    #[instrument(skip(self), fields(piles = %self.state.piles()))]
    pub fn play(&mut self, play: Play) -> Result<RoundTransition, MoveError> {
        MoveContract::pre(self, &play)?;

        let mut next = self.clone();
        let mover = next.state.active_player();
        next.state.apply_move(play.action)?;

        // Judged on the mover, before the turn would have passed.
        let winner = rules::evaluate(next.state.piles(), mover);
        next.winner = winner;
        let entry = next.history.append(mover, play.action);

        #[cfg(debug_assertions)]
        MoveContract::post(self, &next)?;

        *self = next;

        Ok(match winner {
            Some(winner) => {
                info!(loser = %mover, winner = %winner, moves = entry.sequence, "Round finished");
                RoundTransition::Finished { entry, winner }
            }
            None => RoundTransition::Continue(entry),
        })
    }

    /// Replays moves from a fresh round, alternating from `first_mover`.
    #[instrument(skip(moves), fields(piles = %initial, moves = moves.len()))]
    pub fn replay(
        initial: Piles,
        first_mover: Participant,
        moves: &[Move],
    ) -> Result<Round, MoveError> {
        let mut round = Round::new(initial, first_mover);
        for action in moves {
            let actor = round.state.active_player();
            round.play(Play::new(actor, *action))?;
        }
        Ok(round)
    }

    /// Returns the live state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Returns the move log.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Returns the winner once the round is over.
    pub fn winner(&self) -> Option<Participant> {
        self.winner
    }

    /// Returns the layout the round started from.
    pub fn initial(&self) -> &Piles {
        &self.initial
    }

    /// Returns who moved first.
    pub fn first_mover(&self) -> Participant {
        self.first_mover
    }

    /// Returns true once the state is terminal.
    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misere_law_two_singletons() {
        let mut round = Round::new(Piles::from(vec![1, 1]), Participant::Human);

        let first = round
            .play(Play::new(Participant::Human, Move::new(0, 1)))
            .unwrap();
        assert!(matches!(first, RoundTransition::Continue(_)));
        assert_eq!(round.state().piles().as_slice(), &[0, 1]);
        assert!(!round.is_over());

        let second = round
            .play(Play::new(Participant::Automated, Move::new(1, 1)))
            .unwrap();
        assert_eq!(
            second,
            RoundTransition::Finished {
                entry: HistoryEntry {
                    actor: Participant::Automated,
                    pile: 1,
                    count: 1,
                    sequence: 2,
                },
                winner: Participant::Human,
            }
        );
        assert!(round.is_over());
        assert_eq!(round.winner(), Some(Participant::Human));
    }

    #[test]
    fn test_rejected_play_changes_nothing() {
        let mut round = Round::new(Piles::from(vec![2, 0, 5]), Participant::Human);
        let before = round.clone();

        let result = round.play(Play::new(Participant::Human, Move::new(1, 1)));
        assert!(matches!(result, Err(MoveError::CountExceedsPile { .. })));
        assert_eq!(round, before);
        assert!(round.history().is_empty());
    }

    #[test]
    fn test_replay_alternates_from_first_mover() {
        let round = Round::replay(
            Piles::from(vec![3, 4, 5]),
            Participant::Automated,
            &[Move::new(0, 3), Move::new(1, 4), Move::new(2, 1)],
        )
        .unwrap();

        let actors: Vec<_> = round.history().entries().map(|e| e.actor).collect();
        assert_eq!(
            actors,
            vec![
                Participant::Automated,
                Participant::Human,
                Participant::Automated
            ]
        );
        assert_eq!(round.state().piles().as_slice(), &[0, 0, 4]);
        assert_eq!(round.state().active_player(), Participant::Human);
    }

    #[test]
    fn test_replay_stops_on_illegal_move() {
        let result = Round::replay(
            Piles::from(vec![1]),
            Participant::Human,
            &[Move::new(0, 1), Move::new(0, 1)],
        );
        assert_eq!(result, Err(MoveError::GameOver));
    }
}
