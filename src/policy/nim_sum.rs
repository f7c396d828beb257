//! Perfect-play misère strategy, used as a reference opponent.

use super::PolicyProvider;
use strictly_nim::rules::is_losing_position;
use strictly_nim::{Move, Piles};
use tracing::{debug, instrument};

/// Plays Bouton's misère strategy.
///
/// Moves to a position that is lost for the opponent whenever one exists;
/// otherwise takes a single object from the largest pile to drag the game on.
#[derive(Debug, Clone, Default)]
pub struct NimSumPolicy;

impl NimSumPolicy {
    /// Creates the policy.
    pub fn new() -> Self {
        Self
    }

    /// First move (in pile/count order) that leaves the opponent lost.
    #[instrument(level = "debug", fields(piles = %piles))]
    pub fn winning_move(piles: &Piles) -> Option<Move> {
        piles.legal_moves().find(|&action| {
            piles
                .after(action)
                .map(|next| is_losing_position(&next))
                .unwrap_or(false)
        })
    }
}

impl PolicyProvider for NimSumPolicy {
    fn choose_action(&mut self, piles: &Piles, _explore: bool) -> Option<Move> {
        if let Some(action) = Self::winning_move(piles) {
            debug!(%action, "Winning move found");
            return Some(action);
        }

        let (pile, _) = piles
            .iter()
            .enumerate()
            .filter(|&(_, count)| count > 0)
            .max_by_key(|&(_, count)| count)?;
        Some(Move::new(pile, 1))
    }

    fn name(&self) -> &str {
        "nim-sum"
    }
}
