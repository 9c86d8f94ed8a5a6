/// Single event queue
///
/// Key presses and background task results all arrive here and are handled
/// one at a time by the event loop.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use super::events::Event;

pub struct EventQueue {
    sender: Sender<Event>,
    receiver: Receiver<Event>,
}

impl EventQueue {
    /// Create a new event queue
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Get a sender for posting events from other threads
    pub fn sender(&self) -> Sender<Event> {
        self.sender.clone()
    }

    /// Wait up to `timeout` for the next event
    pub fn next_timeout(&self, timeout: Duration) -> Option<Event> {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Take all queued events without blocking
    pub fn drain(&self) -> Vec<Event> {
        self.receiver.try_iter().collect()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::events::KeyInput;

    #[test]
    fn test_receive_in_send_order() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        sender.send(Event::Key(KeyInput::Char('a'))).unwrap();
        sender.send(Event::Cancel).unwrap();

        match queue.next_timeout(Duration::from_millis(10)) {
            Some(Event::Key(KeyInput::Char('a'))) => {}
            other => panic!("Wrong event received: {:?}", other),
        }
        assert!(matches!(queue.next_timeout(Duration::from_millis(10)), Some(Event::Cancel)));
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_timeout_returns_none() {
        let queue = EventQueue::new();
        assert!(queue.next_timeout(Duration::from_millis(5)).is_none());
    }

    #[test]
    fn test_sender_from_other_thread() {
        let queue = EventQueue::new();
        let sender = queue.sender();

        std::thread::spawn(move || {
            sender.send(Event::Cancel).unwrap();
        })
        .join()
        .unwrap();

        assert!(matches!(queue.next_timeout(Duration::from_secs(1)), Some(Event::Cancel)));
    }

    #[test]
    fn test_drain() {
        let queue = EventQueue::new();
        let sender = queue.sender();
        sender.send(Event::Cancel).unwrap();
        sender.send(Event::Key(KeyInput::Enter)).unwrap();

        assert_eq!(queue.drain().len(), 2);
        assert!(queue.next_timeout(Duration::from_millis(5)).is_none());
    }
}
