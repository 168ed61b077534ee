//! # Replay Guard
//!
//! Rejects message ids that have already been observed.
//!
//! ## Design
//!
//! - Ids are remembered in arrival order up to `capacity`
//! - Once full, the oldest id is forgotten to make room
//! - An id still inside the window is never reported as fresh
//! - `capacity = None` remembers every id for the guard's lifetime

use std::collections::{HashSet, VecDeque};

/// Capacity-bounded set of observed message ids.
#[derive(Debug, Clone)]
pub struct ReplayGuard {
    /// Ids currently remembered.
    seen: HashSet<String>,
    /// Same ids, oldest first.
    order: VecDeque<String>,
    /// Maximum remembered ids.
    capacity: Option<usize>,
}

impl ReplayGuard {
    /// Default number of remembered ids.
    pub const DEFAULT_CAPACITY: usize = 100_000;

    /// Create a guard with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Some(Self::DEFAULT_CAPACITY))
    }

    /// Create a guard remembering at most `capacity` ids (`None` = unbounded).
    #[must_use]
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            seen: HashSet::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    /// Record `id`. Returns `true` on its first observation, `false` on a replay.
    pub fn first_observation(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }

        if let Some(capacity) = self.capacity {
            while self.order.len() >= capacity.max(1) {
                match self.order.pop_front() {
                    Some(oldest) => {
                        self.seen.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        self.seen.insert(id.to_string());
        self.order.push_back(id.to_string());
        true
    }

    /// Check if an id is remembered without recording it.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Number of remembered ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Check if no id is remembered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Forget every id.
    pub fn clear(&mut self) {
        self.seen.clear();
        self.order.clear();
    }
}

impl Default for ReplayGuard {
    fn default() -> Self {
        Self::new()
    }
}
