//! Bounded undo/redo history of whole-state snapshots.
//!
//! `past` holds pre-mutation snapshots, newest at the back. When it grows
//! past `capacity` the oldest entry is dropped. Recording a new mutation
//! clears `future`; undo and redo shuttle snapshots between the two stacks.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    future: Vec<T>,
    capacity: usize,
}

impl<T: Clone> History<T> {
    /// Create an empty history holding at most `capacity` undo steps.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { past: VecDeque::with_capacity(capacity), future: Vec::new(), capacity }
    }

    /// Record `before` as an undo point for a mutation about to happen.
    pub fn record(&mut self, before: T) {
        if self.capacity == 0 {
            return;
        }
        if self.past.len() == self.capacity {
            self.past.pop_front();
        }
        self.past.push_back(before);
        self.future.clear();
    }

    /// Step back. Returns the snapshot to restore, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: &T) -> Option<T> {
        let previous = self.past.pop_back()?;
        self.future.push(current.clone());
        Some(previous)
    }

    /// Step forward. Returns the snapshot to restore, or `None` if there is nothing to redo.
    pub fn redo(&mut self, current: &T) -> Option<T> {
        let next = self.future.pop()?;
        if self.past.len() == self.capacity {
            self.past.pop_front();
        }
        self.past.push_back(current.clone());
        Some(next)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}
