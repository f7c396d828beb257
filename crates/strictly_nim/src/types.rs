//! Core domain types for misère Nim.

use super::action::{Move, MoveError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// A participant in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Participant {
    /// The person at the keyboard.
    #[strum(serialize = "human", to_string = "Human")]
    Human,
    /// The policy-driven opponent.
    #[strum(serialize = "automated", serialize = "ai", to_string = "AI")]
    Automated,
}

impl Participant {
    /// Returns the other participant.
    pub fn opponent(self) -> Self {
        match self {
            Participant::Human => Participant::Automated,
            Participant::Automated => Participant::Human,
        }
    }
}

/// Ordered pile counts, indexed `0..len`.
///
/// The number of piles never changes during a game; only
/// [`GameState`](crate::GameState) mutates counts in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Piles(Vec<u32>);

impl Piles {
    /// Creates piles from raw counts.
    pub fn new(counts: impl Into<Vec<u32>>) -> Self {
        Self(counts.into())
    }

    /// Number of piles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no piles at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Count of the pile at `index`.
    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(index).copied()
    }

    /// Counts as a slice.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Iterates over the pile counts.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Total number of objects left.
    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }

    /// Returns true when every pile is empty.
    pub fn is_exhausted(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// All legal moves, ordered by pile then by count.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(pile, &count)| (1..=count).map(move |take| Move::new(pile, take)))
    }

    /// Returns the piles that result from `action`, leaving `self` untouched.
    #[instrument(level = "trace", skip(self), fields(piles = %self))]
    pub fn after(&self, action: Move) -> Result<Piles, MoveError> {
        crate::contracts::LegalMove::check(self, &action)?;
        let mut next = self.clone();
        next.take(action);
        Ok(next)
    }

    /// Subtracts a validated move in place.
    pub(crate) fn take(&mut self, action: Move) {
        self.0[action.pile()] -= action.count();
    }
}

impl From<Vec<u32>> for Piles {
    fn from(counts: Vec<u32>) -> Self {
        Self(counts)
    }
}

impl AsRef<[u32]> for Piles {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

impl std::fmt::Display for Piles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, count) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", count)?;
        }
        write!(f, "]")
    }
}

/// Error parsing a comma-separated pile layout such as `1,3,5,7`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid pile layout {input:?}: {reason}")]
pub struct ParsePilesError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

impl FromStr for Piles {
    type Err = ParsePilesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('[').trim_end_matches(']');
        if trimmed.trim().is_empty() {
            return Err(ParsePilesError {
                input: s.to_string(),
                reason: "no piles given".to_string(),
            });
        }

        trimmed
            .split(',')
            .map(|part| {
                part.trim().parse::<u32>().map_err(|e| ParsePilesError {
                    input: s.to_string(),
                    reason: format!("{:?} is not a pile count ({})", part.trim(), e),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Piles)
    }
}
