use std::{collections::VecDeque, time::Instant};

use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Transient toast. Removed by its expiry timer, never by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
}

#[derive(Debug, Default)]
pub struct NotificationQueue {
    items: VecDeque<Notification>,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, severity: Severity, now: Instant) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        self.items.push_back(Notification {
            id,
            message: message.into(),
            severity,
            created_at: now,
        });
        id
    }

    pub fn remove(&mut self, id: NotificationId) -> Option<Notification> {
        let idx = self.items.iter().position(|n| n.id == id)?;
        self.items.remove(idx)
    }

    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_removal_is_targeted() {
        let now = Instant::now();
        let mut q = NotificationQueue::new();
        let a = q.push("a", Severity::Info, now);
        let b = q.push("b", Severity::Error, now);
        assert_ne!(a, b);

        assert_eq!(q.remove(a).unwrap().message, "a");
        assert!(q.remove(a).is_none());
        assert_eq!(q.len(), 1);
        assert_eq!(q.get(b).unwrap().severity, Severity::Error);
    }
}
