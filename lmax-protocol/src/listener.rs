//! Ordered listener lists.
//!
//! Every event-producing handler owns one [`Listeners`] per event type.
//! Listeners are invoked synchronously on the decoding thread, in the order
//! they were registered. A listener that needs to do slow work should hand
//! the event off (for instance with [`Listeners::forward_to`]) rather than
//! block the decoder.

use std::fmt;

use tokio::sync::mpsc;

/// A registered callback receiving a finished event.
pub type Listener<T> = Box<dyn FnMut(&T) + Send>;

/// Callbacks for one event type, kept in registration order.
pub struct Listeners<T> {
    listeners: Vec<Listener<T>>,
}

impl<T> Listeners<T> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Append a listener. It runs after every listener registered before it.
    pub fn register<F>(&mut self, listener: F)
    where
        F: FnMut(&T) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Invoke every listener with `event`. Returns the number invoked.
    pub fn publish(&mut self, event: &T) -> usize {
        for listener in &mut self.listeners {
            listener(event);
        }
        self.listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl<T: Clone + Send + 'static> Listeners<T> {
    /// Register a listener that clones each event into `tx`.
    ///
    /// Sending never blocks. Events published after the receiver is dropped
    /// are discarded.
    pub fn forward_to(&mut self, tx: mpsc::UnboundedSender<T>) {
        self.register(move |event: &T| {
            if tx.send(event.clone()).is_err() {
                tracing::trace!("listener channel closed, dropping event");
            }
        });
    }
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.listeners.len())
            .finish()
    }
}
