//! Tabular Q-learning trained by self-play.

use super::{PolicyProvider, Trainable};
use crate::config::TrainingConfig;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use strictly_nim::{Move, Piles, rules};
use tracing::{debug, info, instrument, warn};

/// Reward for the move that takes the last object.
const LOSS: f64 = -1.0;
/// Reward for the last move of the participant who ends up winning.
const WIN: f64 = 1.0;

/// Learned value of every `(position, move)` pair seen during training.
///
/// Unseen pairs are worth 0. Greedy play breaks ties in favor of the first
/// legal move in pile/count order, so a trained table plays deterministically.
#[derive(Debug, Clone)]
pub struct QLearningPolicy {
    q: HashMap<(Piles, Move), f64>,
    learning_rate: f64,
    exploration_rate: f64,
    rng: ChaCha8Rng,
}

impl QLearningPolicy {
    /// Creates an untrained policy.
    #[instrument]
    pub fn new(learning_rate: f64, exploration_rate: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            q: HashMap::new(),
            learning_rate,
            exploration_rate,
            rng,
        }
    }

    /// Learned value of `action` from `piles` (0 when unseen).
    pub fn q_value(&self, piles: &Piles, action: Move) -> f64 {
        self.q.get(&(piles.clone(), action)).copied().unwrap_or(0.0)
    }

    /// Number of `(position, move)` pairs with a learned value.
    pub fn table_len(&self) -> usize {
        self.q.len()
    }

    /// One Q-learning step: moves `q(old, action)` toward
    /// `reward + best_future_reward(new)` by the learning rate.
    pub fn update(&mut self, old: &Piles, action: Move, new: &Piles, reward: f64) {
        let current = self.q_value(old, action);
        let target = reward + self.best_future_reward(new);
        let updated = current + self.learning_rate * (target - current);
        self.q.insert((old.clone(), action), updated);
    }

    /// Highest learned value over the legal moves of `piles`, or 0 when
    /// there are none.
    pub fn best_future_reward(&self, piles: &Piles) -> f64 {
        piles
            .legal_moves()
            .map(|action| self.q_value(piles, action))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Greedy move: highest value, first in pile/count order on ties.
    fn best_action(&self, piles: &Piles) -> Option<Move> {
        let mut best: Option<(Move, f64)> = None;
        for action in piles.legal_moves() {
            let value = self.q_value(piles, action);
            match best {
                Some((_, best_value)) if value <= best_value => {}
                _ => best = Some((action, value)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Plays one self-play game from `layout`, updating the table as it goes.
    fn play_episode(&mut self, layout: &Piles) {
        let mut piles = layout.clone();
        // Last (position, move) of the side waiting for its next turn. Its
        // update target is the position it faces once the opponent answered.
        let mut waiting_last: Option<(Piles, Move)> = None;

        while let Some(action) = self.choose_action(&piles, true) {
            let next = match piles.after(action) {
                Ok(next) => next,
                Err(err) => {
                    warn!(error = %err, "Policy proposed an illegal move while training");
                    return;
                }
            };
            if rules::is_exhausted(&next) {
                self.update(&piles, action, &next, LOSS);
                if let Some((state, action)) = waiting_last.take() {
                    self.update(&state, action, &next, WIN);
                }
                return;
            }

            if let Some((state, action)) = waiting_last.take() {
                self.update(&state, action, &next, 0.0);
            }

            waiting_last = Some((piles, action));
            piles = next;
        }
    }
}

impl Trainable for QLearningPolicy {
    #[instrument(skip(config), fields(piles = %layout, episodes = config.episodes().get()))]
    fn train(layout: &Piles, config: &TrainingConfig) -> Self {
        let mut policy = Self::new(
            *config.learning_rate(),
            *config.exploration_rate(),
            *config.seed(),
        );

        let episodes = config.episodes().get();
        for episode in 1..=episodes {
            policy.play_episode(layout);
            if episode % 1000 == 0 {
                debug!(episode, entries = policy.table_len(), "Training progress");
            }
        }

        info!(episodes, entries = policy.table_len(), "Training complete");
        policy
    }
}

impl PolicyProvider for QLearningPolicy {
    fn choose_action(&mut self, piles: &Piles, explore: bool) -> Option<Move> {
        if explore && self.rng.gen_bool(self.exploration_rate) {
            let moves: Vec<Move> = piles.legal_moves().collect();
            return moves.choose(&mut self.rng).copied();
        }
        self.best_action(piles)
    }

    fn name(&self) -> &str {
        "q-learning"
    }
}
