//! Synchronous fan-out event bus.
//!
//! Both engines publish their domain events through an [`EventBus`] so
//! indexers and notification services can observe every state
//! transition without the engines knowing who is listening.

/// Fan-out bus delivering events of type `E` to registered listeners.
///
/// Listeners are invoked inline on the emitting thread, in subscription
/// order; keep handlers fast to avoid stalling the engine operation
/// that emitted the event.
pub struct EventBus<E> {
    listeners: Vec<Box<dyn Fn(&E) + Send + Sync>>,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener for every future event.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver `event` to every listener.
    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}
