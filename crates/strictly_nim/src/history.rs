//! Append-only record of accepted moves.

use super::{Move, Participant};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One accepted move, in the order it was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Who moved.
    pub actor: Participant,
    /// Targeted pile.
    pub pile: usize,
    /// Objects taken.
    pub count: u32,
    /// Position in the log, starting at 1.
    pub sequence: usize,
}

impl HistoryEntry {
    /// The move without attribution.
    pub fn action(&self) -> Move {
        Move::new(self.pile, self.count)
    }
}

impl std::fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} took {} from pile {}", self.actor, self.count, self.pile)
    }
}

/// Ordered log of every accepted move of one game.
///
/// Entries are never edited or removed; the log is dropped with its game.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an accepted move and returns the stored entry.
    #[instrument(level = "debug", skip(self), fields(sequence = self.entries.len() + 1))]
    pub fn append(&mut self, actor: Participant, action: Move) -> HistoryEntry {
        let entry = HistoryEntry {
            actor,
            pile: action.pile(),
            count: action.count(),
            sequence: self.entries.len() + 1,
        };
        self.entries.push(entry);
        entry
    }

    /// Iterates entries in insertion order.
    ///
    /// The iterator is lazy and `Clone`, so it can be restarted freely.
    pub fn entries(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    /// Number of recorded moves.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true before the first move.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    /// Pushes an entry as-is, bypassing sequencing.
    #[cfg(test)]
    pub(crate) fn push_unchecked(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }
}
