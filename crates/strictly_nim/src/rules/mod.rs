//! Game rules for misère Nim.
//!
//! Pure functions for evaluating piles according to the misère
//! termination rule, kept apart from state storage so contracts and
//! policies can compose them.

pub mod misere;

pub use misere::{evaluate, is_exhausted, is_losing_position};
