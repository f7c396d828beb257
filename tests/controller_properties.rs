//! Property-based tests for the turn controller under arbitrary input.

use proptest::prelude::*;
use strictly_arena::{
    AutomatedTurnTicket, NimSumPolicy, TurnController, TurnError, TurnOutcome, TurnState,
};
use strictly_nim::{InvariantSet, Move, NimInvariants, Participant, Piles, Round};

// =============================================================================
// Strategies
// =============================================================================

#[derive(Debug, Clone)]
enum Step {
    /// Human submits an arbitrary (possibly illegal) move.
    Human { pile: usize, count: u32 },
    /// Redeem the most recent ticket.
    Resolve,
    /// Redeem a ticket from before the last reset, if any.
    ResolveStale,
    /// Reset to the same layout.
    Reset(Participant),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (0usize..5, 0u32..6).prop_map(|(pile, count)| Step::Human { pile, count }),
        3 => Just(Step::Resolve),
        1 => Just(Step::ResolveStale),
        1 => prop_oneof![Just(Participant::Human), Just(Participant::Automated)].prop_map(Step::Reset),
    ]
}

fn arb_layout() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..6, 1..4).prop_filter("not exhausted", |v| v.iter().any(|&c| c > 0))
}

proptest! {
    #[test]
    fn controller_keeps_round_consistent(
        layout in arb_layout(),
        steps in proptest::collection::vec(arb_step(), 0..60),
    ) {
        let layout = Piles::from(layout);
        let mut controller = TurnController::new(
            layout.clone(),
            Participant::Human,
            Box::new(NimSumPolicy::new()),
        );
        let mut current: Option<AutomatedTurnTicket> = controller.pending_ticket();
        let mut stale: Option<AutomatedTurnTicket> = None;

        for step in steps {
            let piles_before = controller.piles().clone();
            let len_before = controller.history().len();

            match step {
                Step::Human { pile, count } => {
                    match controller.submit_human_move(Move::new(pile, count)) {
                        Ok(TurnOutcome::AutomatedScheduled { ticket, .. }) => current = Some(ticket),
                        Ok(_) => {}
                        Err(TurnError::IllegalMove(_)) => {
                            prop_assert_eq!(controller.piles(), &piles_before);
                            prop_assert_eq!(controller.history().len(), len_before);
                        }
                        Err(err) => prop_assert!(false, "unexpected error {}", err),
                    }
                }
                Step::Resolve => {
                    if let Some(ticket) = current.take() {
                        let outcome = controller.resolve_automated_turn(ticket);
                        prop_assert!(outcome.is_ok());
                        prop_assert_ne!(outcome.unwrap(), TurnOutcome::Discarded);
                        current = controller.pending_ticket();
                    }
                }
                Step::ResolveStale => {
                    if let Some(ticket) = stale {
                        prop_assert_eq!(
                            controller.resolve_automated_turn(ticket).unwrap(),
                            TurnOutcome::Discarded
                        );
                        prop_assert_eq!(controller.piles(), &piles_before);
                    }
                }
                Step::Reset(first_mover) => {
                    stale = current.or(stale);
                    current = controller.reset(layout.clone(), first_mover);
                    prop_assert!(controller.history().is_empty());
                }
            }

            // The live game must always be a legal replay of its history.
            let moves: Vec<Move> = controller.history().entries().map(|e| e.action()).collect();
            let replayed = Round::replay(
                controller.initial_piles().clone(),
                controller.first_mover(),
                &moves,
            );
            prop_assert!(replayed.is_ok());
            let replayed = replayed.unwrap();
            prop_assert_eq!(replayed.state(), controller.state());
            prop_assert!(NimInvariants::check_all(&replayed).is_ok());

            prop_assert_eq!(
                controller.turn() == TurnState::GameOver,
                controller.piles().is_exhausted()
            );
        }
    }
}
