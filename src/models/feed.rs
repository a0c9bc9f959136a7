use std::collections::VecDeque;

use crate::{config::FEED_CAPACITY, domain::Signal};

/// Most-recent-first list of received signals, bounded in size.
#[derive(Debug, Clone)]
pub struct SignalFeed {
    items: VecDeque<Signal>,
    capacity: usize,
}

impl SignalFeed {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a feed by inserting `oldest_first` in order, so the last one ends up on top.
    pub fn from_oldest_first(oldest_first: impl IntoIterator<Item = Signal>, capacity: usize) -> Self {
        let mut feed = Self::new(capacity);
        for signal in oldest_first {
            feed.insert_head(signal);
        }
        feed
    }

    /// Returns the evicted tail entry when the feed was full.
    pub fn insert_head(&mut self, signal: Signal) -> Option<Signal> {
        self.items.push_front(signal);
        if self.items.len() > self.capacity {
            self.items.pop_back()
        } else {
            None
        }
    }

    pub fn head(&self) -> Option<&Signal> {
        self.items.front()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SignalFeed {
    fn default() -> Self {
        Self::new(FEED_CAPACITY)
    }
}
