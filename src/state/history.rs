//! Undo/redo history of circuit snapshots.

use std::collections::VecDeque;

use crate::circuit::Circuit;
use crate::error::{CircuitError, Result};

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Two stacks of immutable snapshots.
///
/// The undo stack holds pre-mutation states, oldest first, and is bounded by
/// `limit`. The redo stack holds states undone since the last mutation.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Circuit>,
    redo: Vec<Circuit>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history keeping at most `limit` undo steps.
    ///
    /// The limit is at least one, so a mutation can always be undone.
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the state a mutation is about to replace.
    ///
    /// Clears the redo stack and drops the oldest snapshot past the limit.
    pub fn record(&mut self, snapshot: Circuit) {
        self.redo.clear();
        self.push_undo(snapshot);
    }

    /// Step back: `current` moves to the redo stack and is replaced by the
    /// most recent snapshot.
    pub fn undo(&mut self, current: &mut Circuit) -> Result<()> {
        let previous = self.undo.pop_back().ok_or(CircuitError::NothingToUndo)?;
        self.redo.push(std::mem::replace(current, previous));
        Ok(())
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: &mut Circuit) -> Result<()> {
        let next = self.redo.pop().ok_or(CircuitError::NothingToRedo)?;
        let replaced = std::mem::replace(current, next);
        self.push_undo(replaced);
        Ok(())
    }

    /// Empty both stacks.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of snapshots on the undo stack.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of snapshots on the redo stack.
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    fn push_undo(&mut self, snapshot: Circuit) {
        self.undo.push_back(snapshot);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
    }
}
