//! Signal module - explicit observer registration and fan-out
//!
//! The engine publishes state snapshots and line-clear events by invoking
//! every registered callback synchronously, in registration order, before the
//! mutating command returns. No channels, no threads.

/// Handle returned by `subscribe`, used to unsubscribe
pub type SubscriberId = u64;

/// A list of subscriber callbacks for one event type
pub struct Signal<T> {
    next_id: SubscriberId,
    subscribers: Vec<(SubscriberId, Box<dyn FnMut(&T)>)>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Register a callback; returns a handle for `unsubscribe`
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriberId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if the handle is unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Invoke every subscriber with `value`, in registration order
    pub fn emit(&mut self, value: &T) {
        for (_, callback) in &mut self.subscribers {
            callback(value);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
