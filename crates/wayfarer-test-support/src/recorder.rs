//! Event recorder: captures everything published to a channel.

use std::cell::RefCell;
use std::rc::Rc;

use wayfarer_core::event::Handler;

/// Records clones of every event delivered through its handler.
pub struct Recorder<E> {
    events: Rc<RefCell<Vec<E>>>,
    handler: Handler<E>,
}

impl<E: Clone + 'static> Recorder<E> {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let handler: Handler<E> = Rc::new(move |event: &E| sink.borrow_mut().push(event.clone()));
        Self { events, handler }
    }

    /// The handler to subscribe. Every call returns the same `Rc`, so
    /// subscribing twice exercises idempotent registration.
    #[must_use]
    pub fn handler(&self) -> Handler<E> {
        Rc::clone(&self.handler)
    }

    /// Snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<E> {
        self.events.borrow().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl<E: Clone + 'static> Default for Recorder<E> {
    fn default() -> Self {
        Self::new()
    }
}
