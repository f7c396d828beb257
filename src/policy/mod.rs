//! Move providers for the automated participant.
//!
//! The controller only talks to [`PolicyProvider`]. How a policy learned
//! its moves is its own business; [`Trainable`] covers the one-time,
//! blocking training step that happens before any game exists.

mod nim_sum;
mod q_learning;

pub use nim_sum::NimSumPolicy;
pub use q_learning::QLearningPolicy;

use crate::config::TrainingConfig;
use strictly_nim::{Move, Piles};

/// Supplies the automated participant's moves.
pub trait PolicyProvider: Send {
    /// Picks a move for a read-only snapshot of the piles.
    ///
    /// Must return a legal move for `piles`, or `None` when there is none.
    /// `explore` is only ever set while training; interactive play asks for
    /// the best known move.
    fn choose_action(&mut self, piles: &Piles, explore: bool) -> Option<Move>;

    /// Returns the policy's display name.
    fn name(&self) -> &str;
}

impl<P: PolicyProvider + ?Sized> PolicyProvider for Box<P> {
    fn choose_action(&mut self, piles: &Piles, explore: bool) -> Option<Move> {
        (**self).choose_action(piles, explore)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// A policy produced by a one-time training run.
pub trait Trainable: Sized {
    /// Trains from scratch on games starting at `layout`.
    ///
    /// Blocks until `config.episodes()` games have been played.
    fn train(layout: &Piles, config: &TrainingConfig) -> Self;
}

/// Every position reachable by removing objects from `layout`, including
/// `layout` itself and the exhausted position.
pub fn reachable_positions(layout: &Piles) -> Vec<Piles> {
    layout.iter().fold(vec![Vec::new()], |prefixes, max| {
        prefixes
            .into_iter()
            .flat_map(|prefix| {
                (0..=max).map(move |count| {
                    let mut next = prefix.clone();
                    next.push(count);
                    next
                })
            })
            .collect()
    })
    .into_iter()
    .map(Piles::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reachable_positions_counts_every_combination() {
        let positions = reachable_positions(&Piles::from(vec![1, 3, 5, 7]));
        assert_eq!(positions.len(), 2 * 4 * 6 * 8);
        assert!(positions.contains(&Piles::from(vec![0, 0, 0, 0])));
        assert!(positions.contains(&Piles::from(vec![1, 3, 5, 7])));
    }

    #[test]
    fn test_boxed_policy_forwards() {
        let mut boxed: Box<dyn PolicyProvider> = Box::new(NimSumPolicy::new());
        assert_eq!(boxed.name(), "nim-sum");
        let action = boxed.choose_action(&Piles::from(vec![1]), false);
        assert_eq!(action, Some(Move::new(0, 1)));
    }
}
