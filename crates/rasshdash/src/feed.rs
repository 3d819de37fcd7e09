//! Bounded newest-first buffer of recent attacker actions.

use rassh_shared::ActivityRecord;
use std::collections::VecDeque;

/// Maximum number of records kept
pub const FEED_CAPACITY: usize = 20;

#[derive(Debug, Clone, Default)]
pub struct ActivityFeedBuffer {
    records: VecDeque<ActivityRecord>,
}

impl ActivityFeedBuffer {
    pub fn new() -> Self {
        Self {
            records: VecDeque::with_capacity(FEED_CAPACITY + 1),
        }
    }

    /// Prepend a record, evicting from the tail past capacity
    pub fn insert(&mut self, record: ActivityRecord) {
        self.records.push_front(record);
        self.records.truncate(FEED_CAPACITY);
    }

    /// Discard everything and take `records` in the given order
    pub fn replace_all(&mut self, records: Vec<ActivityRecord>) {
        self.records.clear();
        self.records
            .extend(records.into_iter().take(FEED_CAPACITY));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &ActivityRecord> {
        self.records.iter()
    }
}
