//! Terminal invariant: the game is over exactly when the piles are empty.

use super::super::{rules, Round};
use super::Invariant;

/// Invariant: `terminal` matches empty piles, and a finished round names
/// the opponent of the final mover as winner.
pub struct TerminalIffEmptyInvariant;

impl Invariant<Round> for TerminalIffEmptyInvariant {
    fn holds(round: &Round) -> bool {
        let state = round.state();
        if state.is_terminal() != rules::is_exhausted(state.piles()) {
            return false;
        }

        match (round.history().last(), round.is_over()) {
            (Some(last), true) => round.winner() == Some(last.actor.opponent()),
            // An exhausted starting layout ends before anyone moves.
            (None, true) => round.winner().is_none(),
            (_, false) => round.winner().is_none(),
        }
    }

    fn description() -> &'static str {
        "Terminal exactly when all piles are empty, and the final mover loses"
    }
}
