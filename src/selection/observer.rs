//! Explicit observer lists.
//!
//! Components publish changes through a [`Listeners`] list; subscribers get
//! a [`SubscriptionToken`] back and hand it to `unsubscribe` when done.
//! Listeners run synchronously, in subscription order, on the caller's
//! thread.

use std::fmt;

/// Handle identifying one subscription. Tokens are never reused within a
/// [`Listeners`] list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

/// Boxed listener callback.
pub type Listener<T> = Box<dyn FnMut(&T)>;

/// Ordered list of listeners for values of type `T`.
pub struct Listeners<T: ?Sized> {
    entries: Vec<(SubscriptionToken, Listener<T>)>,
    next_id: u64,
}

impl<T: ?Sized> Listeners<T> {
    /// Empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a listener.
    pub fn subscribe(&mut self, listener: Listener<T>) -> SubscriptionToken {
        let token = SubscriptionToken(self.next_id);
        self.next_id += 1;
        self.entries.push((token, listener));
        token
    }

    /// Remove a listener. Returns `false` if the token was unknown (already
    /// removed, or from another list).
    pub fn unsubscribe(&mut self, token: SubscriptionToken) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(t, _)| *t != token);
        self.entries.len() != before
    }

    /// Call every listener with `value`.
    pub fn notify(&mut self, value: &T) {
        for (_, listener) in &mut self.entries {
            listener(value);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn listeners_run_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut listeners: Listeners<i32> = Listeners::new();

        let first = Rc::clone(&log);
        let _ = listeners.subscribe(Box::new(move |v: &i32| {
            first.borrow_mut().push(format!("first {v}"));
        }));
        let second = Rc::clone(&log);
        let _ = listeners.subscribe(Box::new(move |v: &i32| {
            second.borrow_mut().push(format!("second {v}"));
        }));

        listeners.notify(&7);
        assert_eq!(*log.borrow(), vec!["first 7", "second 7"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut listeners: Listeners<()> = Listeners::new();
        let counter = Rc::clone(&count);
        let token = listeners.subscribe(Box::new(move |_: &()| {
            *counter.borrow_mut() += 1;
        }));

        listeners.notify(&());
        assert!(listeners.unsubscribe(token));
        assert!(!listeners.unsubscribe(token));
        listeners.notify(&());

        assert_eq!(*count.borrow(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn tokens_are_not_reused() {
        let mut listeners: Listeners<u8> = Listeners::new();
        let a = listeners.subscribe(Box::new(|_: &u8| {}));
        assert!(listeners.unsubscribe(a));
        let b = listeners.subscribe(Box::new(|_: &u8| {}));
        assert_ne!(a, b);
        assert_eq!(listeners.len(), 1);
    }
}
