//! Synchronous observable values.
//!
//! An [`Observable`] holds a value and a list of listeners. Listeners run in
//! registration order, on the caller's stack, before the mutating call
//! returns. There is no batching.

use std::fmt;

/// Identifies a listener registered on one [`Observable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener<T> = Box<dyn FnMut(&T)>;

/// A value that notifies listeners when it changes.
pub struct Observable<T> {
    value: T,
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: u64,
}

impl<T> Observable<T> {
    /// Create an observable with an initial value and no listeners.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            value,
            listeners: Vec::new(),
            next_id: 1,
        }
    }

    /// Current value.
    #[must_use]
    pub const fn get(&self) -> &T {
        &self.value
    }

    /// Register a listener and call it once with the current value.
    pub fn subscribe(&mut self, mut listener: impl FnMut(&T) + 'static) -> ListenerId {
        listener(&self.value);
        self.listen(listener)
    }

    /// Register a listener for future changes only.
    pub fn listen(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unlisten(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Replace the value and notify every listener, even if it is unchanged.
    pub fn replace(&mut self, value: T) {
        self.value = value;
        self.notify();
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.value);
        }
    }
}

impl<T: PartialEq> Observable<T> {
    /// Set the value, notifying listeners only if it changed.
    ///
    /// Returns whether the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.replace(value);
        true
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<i32>>>, impl FnMut(&i32) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |value: &i32| sink.borrow_mut().push(*value))
    }

    #[test]
    fn test_subscribe_delivers_current_value() {
        let mut value = Observable::new(1);
        let (seen, listener) = recorder();

        value.subscribe(listener);
        value.set(2);

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_listen_skips_current_value() {
        let mut value = Observable::new(1);
        let (seen, listener) = recorder();

        value.listen(listener);
        value.set(2);

        assert_eq!(*seen.borrow(), vec![2]);
    }

    #[test]
    fn test_set_ignores_unchanged_value() {
        let mut value = Observable::new(5);
        let (seen, listener) = recorder();
        value.listen(listener);

        assert!(!value.set(5));
        assert!(value.set(6));
        value.replace(6);

        assert_eq!(*seen.borrow(), vec![6, 6]);
    }

    #[test]
    fn test_unlisten() {
        let mut value = Observable::new(0);
        let (seen, listener) = recorder();
        let id = value.listen(listener);

        assert!(value.unlisten(id));
        assert!(!value.unlisten(id));
        value.set(1);

        assert!(seen.borrow().is_empty());
        assert_eq!(value.listener_count(), 0);
    }

    #[test]
    fn test_listeners_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut value = Observable::new(0);

        let first = Rc::clone(&order);
        value.listen(move |_: &i32| first.borrow_mut().push("first"));
        let second = Rc::clone(&order);
        value.listen(move |_: &i32| second.borrow_mut().push("second"));

        value.set(1);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }
}
