//! Typed event channels.
//!
//! Every event category (stat changes, attack results, scene changes, ...)
//! gets its own `EventChannel<E>`. Subscribers register a handler for the
//! exact event type they consume; there is no shared listener base trait.
//!
//! Channels are single-threaded: handlers are `Rc` closures and are invoked
//! synchronously, in registration order, before `publish` returns.

use std::fmt;
use std::rc::Rc;

/// A subscriber callback for events of type `E`.
pub type Handler<E> = Rc<dyn Fn(&E)>;

/// An ordered set of handlers for one event category.
pub struct EventChannel<E> {
    handlers: Vec<Handler<E>>,
}

impl<E> EventChannel<E> {
    /// Creates a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Registers `handler`.
    ///
    /// Subscribing a handler that is already registered (the same `Rc`) is a
    /// no-op and returns `false`.
    pub fn subscribe(&mut self, handler: Handler<E>) -> bool {
        if self.contains(&handler) {
            return false;
        }
        self.handlers.push(handler);
        true
    }

    /// Returns `true` if this exact handler is registered.
    #[must_use]
    pub fn contains(&self, handler: &Handler<E>) -> bool {
        self.handlers
            .iter()
            .any(|registered| std::ptr::addr_eq(Rc::as_ptr(registered), Rc::as_ptr(handler)))
    }

    /// Delivers `event` to every handler in registration order.
    pub fn publish(&self, event: &E) {
        for handler in &self.handlers {
            handler(event);
        }
    }

    /// Removes every handler.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Moves every handler of `self` into a fresh channel, leaving `self` empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        Self {
            handlers: std::mem::take(&mut self.handlers),
        }
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` when nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn recording(log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> Handler<u32> {
        let log = Rc::clone(log);
        Rc::new(move |value: &u32| log.borrow_mut().push(format!("{tag}:{value}")))
    }

    #[test]
    fn test_publish_reaches_handlers_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::new();
        channel.subscribe(recording(&log, "a"));
        channel.subscribe(recording(&log, "b"));

        channel.publish(&7);

        assert_eq!(*log.borrow(), vec!["a:7".to_owned(), "b:7".to_owned()]);
    }

    #[test]
    fn test_subscribing_same_handler_twice_is_noop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let handler = recording(&log, "a");
        let mut channel = EventChannel::new();

        assert!(channel.subscribe(Rc::clone(&handler)));
        assert!(!channel.subscribe(Rc::clone(&handler)));
        channel.publish(&1);

        assert_eq!(channel.len(), 1);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_distinct_handlers_with_same_body_are_both_registered() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::new();

        channel.subscribe(recording(&log, "a"));
        channel.subscribe(recording(&log, "a"));

        assert_eq!(channel.len(), 2);
    }

    #[test]
    fn test_clear_and_take_leave_channel_empty() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut channel = EventChannel::new();
        channel.subscribe(recording(&log, "a"));

        let moved = channel.take();
        assert!(channel.is_empty());
        assert_eq!(moved.len(), 1);

        let mut moved = moved;
        moved.clear();
        moved.publish(&3);
        assert!(log.borrow().is_empty());
    }
}
