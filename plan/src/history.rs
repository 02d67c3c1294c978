//! Bounded undo/redo history of full document snapshots.
//!
//! The store pushes the element list as it was *before* each edit. `undo`
//! swaps the live value with the newest past snapshot and parks the live
//! value on the redo stack; `redo` does the reverse. Recording a new edit
//! discards the redo stack. The past stack is a ring: once `depth` snapshots
//! are held, the oldest is dropped.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::DEFAULT_HISTORY_DEPTH;

/// Two stacks of snapshots with a retention cap on the past stack.
#[derive(Debug, Clone)]
pub struct History<S> {
    past: VecDeque<S>,
    future: Vec<S>,
    depth: usize,
}

impl<S> History<S> {
    /// Create a history retaining [`DEFAULT_HISTORY_DEPTH`] undo steps.
    #[must_use]
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_HISTORY_DEPTH)
    }

    /// Create a history retaining at most `depth` undo steps. A depth of 0
    /// disables undo entirely.
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        Self { past: VecDeque::new(), future: Vec::new(), depth }
    }

    /// Record the state preceding an edit.
    pub fn record(&mut self, before: S) {
        self.future.clear();
        if self.depth == 0 {
            return;
        }
        self.past.push_back(before);
        while self.past.len() > self.depth {
            self.past.pop_front();
        }
    }

    /// Step back one edit. Returns `false` (and leaves `current` alone) when
    /// there is nothing to undo.
    pub fn undo(&mut self, current: &mut S) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        self.future.push(std::mem::replace(current, previous));
        true
    }

    /// Re-apply the most recently undone edit. Returns `false` when there is
    /// nothing to redo.
    pub fn redo(&mut self, current: &mut S) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        self.past.push_back(std::mem::replace(current, next));
        true
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self::new()
    }
}
