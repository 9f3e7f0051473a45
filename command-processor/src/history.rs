/// Bounded newest-first log
///
/// Fixed-capacity container used for both the exchange log and the
/// diagnostics sink. Appending to a full log evicts the oldest entry.

use serde::Serialize;
use std::collections::VecDeque;
use tracing::trace;

/// Capacity of the exchange and diagnostics logs
pub const LOG_CAPACITY: usize = 12;

#[derive(Debug, Clone)]
pub struct BoundedLog<T> {
    // Front is newest
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    /// Create a log with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(LOG_CAPACITY)
    }

    /// Create a log holding at most `capacity` entries (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend an entry, returning the evicted oldest entry if the log was full
    pub fn push(&mut self, entry: T) -> Option<T> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_back()
        } else {
            None
        };

        if evicted.is_some() {
            trace!(capacity = self.capacity, "evicted oldest log entry");
        }

        self.entries.push_front(entry);
        evicted
    }

    /// Newest entry
    pub fn latest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// Oldest retained entry
    pub fn oldest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Iterate newest-first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T: Clone> BoundedLog<T> {
    /// Copy of the entries, newest-first
    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }
}

impl<T> Default for BoundedLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize> Serialize for BoundedLog<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}
