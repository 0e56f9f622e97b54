//! Bounded, deduplicated record of cells changed since the last redraw.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// What the renderer should repaint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Redraw {
    /// Only these cells changed, in the order they were marked
    Incremental(Vec<usize>),
    /// The set saturated; repaint the whole grid
    Full,
}

#[derive(Debug, Clone)]
pub struct DirtySet {
    queue: Vec<usize>,
    pending: Vec<bool>,
    capacity: usize,
}

impl DirtySet {
    /// Tracker for `cells` indices with capacity equal to the cell count
    pub fn new(cells: usize) -> Self {
        Self::with_capacity(cells, cells)
    }

    pub fn with_capacity(cells: usize, capacity: usize) -> Self {
        Self {
            queue: Vec::with_capacity(capacity),
            pending: vec![false; cells],
            capacity,
        }
    }

    /// Record `index` unless it is already pending or the set is full.
    /// Returns whether it was recorded.
    pub fn mark(&mut self, index: usize) -> bool {
        if self.pending[index] || self.queue.len() >= self.capacity {
            return false;
        }

        self.queue.push(index);
        self.pending[index] = true;

        if self.queue.len() == self.capacity {
            debug!(capacity = self.capacity, "Dirty set saturated");
        }
        true
    }

    /// Take every recorded index in insertion order
    pub fn drain(&mut self) -> Vec<usize> {
        for &index in &self.queue {
            self.pending[index] = false;
        }
        std::mem::take(&mut self.queue)
    }

    /// Forget every entry without returning them, after a full repaint
    pub fn force_full_scan(&mut self) {
        for index in self.queue.drain(..) {
            self.pending[index] = false;
        }
    }

    pub fn is_overflowed(&self) -> bool {
        self.queue.len() >= self.capacity
    }

    /// Drain, or fall back to a full repaint once saturated
    pub fn take_redraw(&mut self) -> Redraw {
        if self.is_overflowed() {
            self.force_full_scan();
            Redraw::Full
        } else {
            Redraw::Incremental(self.drain())
        }
    }

    pub fn is_pending(&self, index: usize) -> bool {
        self.pending[index]
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
