//! Bounded buffer of recently sent notifications.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::notification::Notification;

/// FIFO of in-flight notifications, bounded by capacity.
///
/// Once full, adding drops the oldest entry; anything older than the window
/// was accepted before any failure the gateway can still report.
#[derive(Debug)]
pub(crate) struct SendBuffer {
    capacity: usize,
    entries: Mutex<VecDeque<Notification>>,
}

impl SendBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append a notification, dropping the oldest once past capacity.
    pub(crate) fn add(&self, notification: Notification) {
        let mut entries = self.entries.lock().unwrap();
        entries.push_back(notification);
        if entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Most recently buffered notification with this identifier.
    pub(crate) fn find(&self, identifier: u32) -> Option<Notification> {
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .rev()
            .find(|n| n.identifier == identifier)
            .cloned()
    }

    /// Every notification buffered strictly after the first entry with this
    /// identifier, in send order. Empty when the identifier is not buffered.
    pub(crate) fn notifications_after(&self, identifier: u32) -> Vec<Notification> {
        let entries = self.entries.lock().unwrap();
        match entries.iter().position(|n| n.identifier == identifier) {
            Some(at) => entries.iter().skip(at + 1).cloned().collect(),
            None => Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(identifier: u32) -> Notification {
        Notification {
            identifier,
            ..Notification::default()
        }
    }

    #[test]
    fn test_bounded_to_capacity() {
        let buffer = SendBuffer::new(50);
        for i in 1..=60 {
            buffer.add(notification(i));
        }

        assert_eq!(buffer.len(), 50);
        // The oldest ten were dropped.
        assert!(buffer.find(10).is_none());
        assert!(buffer.find(11).is_some());
        assert!(buffer.find(60).is_some());
    }

    #[test]
    fn test_notifications_after_preserves_order() {
        let buffer = SendBuffer::new(50);
        for i in 1..=10 {
            buffer.add(notification(i));
        }

        let after: Vec<u32> = buffer
            .notifications_after(4)
            .into_iter()
            .map(|n| n.identifier)
            .collect();
        assert_eq!(after, vec![5, 6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_notifications_after_unknown_identifier() {
        let buffer = SendBuffer::new(50);
        for i in 1..=5 {
            buffer.add(notification(i));
        }

        assert!(buffer.notifications_after(99).is_empty());
    }

    #[test]
    fn test_notifications_after_last_entry() {
        let buffer = SendBuffer::new(50);
        for i in 1..=5 {
            buffer.add(notification(i));
        }

        assert!(buffer.notifications_after(5).is_empty());
    }

    #[test]
    fn test_find_prefers_most_recent() {
        let buffer = SendBuffer::new(50);
        let mut first = notification(7);
        first.id = "first".to_string();
        let mut second = notification(7);
        second.id = "second".to_string();
        buffer.add(first);
        buffer.add(second);

        assert_eq!(buffer.find(7).unwrap().id, "second");
    }
}
