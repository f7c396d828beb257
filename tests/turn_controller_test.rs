//! End-to-end games through the synchronous turn controller.

use std::num::NonZeroU32;
use strictly_arena::{
    GameConfig, NimSumPolicy, PolicyProvider, QLearningPolicy, Trainable, TrainingConfig,
    TurnController, TurnOutcome, TurnState,
};
use strictly_nim::{Move, Participant, Piles, rules};

/// Plays a game to the end; the human side always takes the first legal move.
fn play_out(controller: &mut TurnController) -> Participant {
    let mut ticket = controller.pending_ticket();
    loop {
        let outcome = match ticket.take() {
            Some(ticket) => controller.resolve_automated_turn(ticket).unwrap(),
            None => {
                let action = controller.piles().legal_moves().next().unwrap();
                controller.submit_human_move(action).unwrap()
            }
        };
        match outcome {
            TurnOutcome::AutomatedScheduled { ticket: next, .. } => ticket = Some(next),
            TurnOutcome::Finished { winner, .. } => return winner,
            TurnOutcome::AwaitingHuman(_) => {}
            TurnOutcome::Discarded => panic!("Fresh ticket discarded"),
        }
    }
}

fn training(episodes: u32) -> TrainingConfig {
    TrainingConfig::default()
        .with_episodes(NonZeroU32::new(episodes).unwrap())
        .with_seed(Some(2024))
}

#[test]
fn test_trained_policy_completes_default_game() {
    let config = GameConfig::default().with_training(training(2_000));
    let policy = QLearningPolicy::train(config.initial_piles(), config.training());

    let mut controller = TurnController::new(
        config.initial_piles().clone(),
        *config.first_mover(),
        Box::new(policy),
    );
    let winner = play_out(&mut controller);

    assert_eq!(controller.turn(), TurnState::GameOver);
    assert!(controller.piles().is_exhausted());
    let last = controller.history().last().unwrap();
    assert_eq!(winner, last.actor.opponent());
    assert_eq!(controller.policy_name(), "q-learning");
}

#[test]
fn test_trained_policy_finds_the_only_winning_move() {
    // From [1, 2] the mover must clear the 2-pile, leaving the lone object.
    let layout = Piles::from(vec![1, 2]);
    let mut policy = QLearningPolicy::train(&layout, &training(1_000));
    assert_eq!(policy.choose_action(&layout, false), Some(Move::new(1, 2)));
}

#[test]
fn test_nim_sum_wins_every_winnable_opening() {
    for counts in [vec![3, 4, 5], vec![1, 1], vec![2, 3], vec![1, 2, 2]] {
        let layout = Piles::from(counts);
        assert!(!rules::is_losing_position(&layout));

        let mut controller = TurnController::new(
            layout.clone(),
            Participant::Automated,
            Box::new(NimSumPolicy::new()),
        );
        assert_eq!(
            play_out(&mut controller),
            Participant::Automated,
            "nim-sum lost from {}",
            layout
        );
    }
}

#[test]
fn test_generation_survives_many_resets() {
    let mut controller = TurnController::new(
        Piles::from(vec![1, 3, 5, 7]),
        Participant::Human,
        Box::new(NimSumPolicy::new()),
    );
    for expected in 1..=5 {
        controller.restart();
        assert_eq!(controller.generation(), expected);
        assert!(controller.history().is_empty());
    }
    let winner = play_out(&mut controller);
    assert!(controller.winner() == Some(winner));
}

#[test]
fn test_boxed_policy_is_usable_directly() {
    let mut policy: Box<dyn PolicyProvider> = Box::new(NimSumPolicy::new());
    let piles = Piles::from(vec![0, 0, 1]);
    assert_eq!(policy.choose_action(&piles, false), Some(Move::new(2, 1)));
}
