//! Strictly Arena - misère Nim between a human and a trained policy.
//!
//! The game rules live in [`strictly_nim`]. This crate adds everything
//! around them:
//!
//! - **Config**: TOML startup configuration
//! - **Policy**: the automated participant's move providers and training
//! - **Controller**: the synchronous turn state machine
//! - **Orchestrator**: the async driver that paces the automated turn
//! - **Terminal**: line-based input parsing and rendering
//!
//! # Example
//!
//! ```
//! use strictly_arena::{NimSumPolicy, TurnController, TurnOutcome, TurnState};
//! use strictly_nim::{Move, Participant, Piles};
//!
//! let mut controller = TurnController::new(
//!     Piles::from(vec![1, 3, 5, 7]),
//!     Participant::Human,
//!     Box::new(NimSumPolicy::new()),
//! );
//!
//! let outcome = controller.submit_human_move(Move::new(3, 7)).unwrap();
//! if let TurnOutcome::AutomatedScheduled { ticket, .. } = outcome {
//!     controller.resolve_automated_turn(ticket).unwrap();
//! }
//! assert_eq!(controller.turn(), TurnState::AwaitingHumanInput);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod controller;
mod orchestrator;
pub mod policy;
pub mod terminal;

pub use config::{ConfigError, GameConfig, TrainingConfig};
pub use controller::{AutomatedTurnTicket, TurnController, TurnError, TurnOutcome, TurnState};
pub use orchestrator::{Command, GameEvent, Orchestrator, OrchestratorHandle};
pub use policy::{NimSumPolicy, PolicyProvider, QLearningPolicy, Trainable};
