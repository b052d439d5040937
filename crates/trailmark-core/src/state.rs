use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

type Watcher<T> = Box<dyn Fn(&T)>;

struct StateInner<T> {
    value: RefCell<T>,
    watchers: RefCell<FxHashMap<u64, Watcher<T>>>,
    next_watcher_id: Cell<u64>,
}

impl<T> StateInner<T> {
    fn notify(&self) {
        // Watchers may read the state, so the value borrow must be released
        // before iterating. A watcher must not mutate the state it watches.
        let watchers = self.watchers.borrow();
        let value = self.value.borrow();
        for watcher in watchers.values() {
            watcher(&value);
        }
    }
}

/// Observable value cell for single-threaded UI state.
///
/// Writers call [`set`](MutableState::set); readers either poll through
/// [`get`](MutableState::get)/[`with`](MutableState::with) or subscribe with
/// [`watch`](MutableState::watch). Watchers run synchronously inside `set`
/// and are removed when their registration drops, so a torn-down view leaks
/// no handlers.
pub struct MutableState<T> {
    inner: Rc<StateInner<T>>,
}

impl<T> MutableState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(StateInner {
                value: RefCell::new(initial),
                watchers: RefCell::new(FxHashMap::default()),
                next_watcher_id: Cell::new(1),
            }),
        }
    }

    /// Reads the current value through a closure without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Replaces the value and notifies all watchers.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.inner.notify();
    }

    /// Read-only view sharing this cell's storage.
    pub fn as_state(&self) -> State<T> {
        State {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Subscribes to value changes. The watcher is invoked on every `set`
    /// until the returned registration is dropped.
    pub fn watch(&self, watcher: impl Fn(&T) + 'static) -> WatcherRegistration<T> {
        let id = self.inner.next_watcher_id.get();
        self.inner.next_watcher_id.set(id + 1);
        self.inner.watchers.borrow_mut().insert(id, Box::new(watcher));
        WatcherRegistration {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }
}

impl<T: Clone> MutableState<T> {
    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Read-only view of a [`MutableState`].
pub struct State<T> {
    inner: Rc<StateInner<T>>,
}

impl<T> State<T> {
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    pub fn watch(&self, watcher: impl Fn(&T) + 'static) -> WatcherRegistration<T> {
        let id = self.inner.next_watcher_id.get();
        self.inner.next_watcher_id.set(id + 1);
        self.inner.watchers.borrow_mut().insert(id, Box::new(watcher));
        WatcherRegistration {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }
}

impl<T: Clone> State<T> {
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Removes its watcher from the owning state when dropped.
pub struct WatcherRegistration<T> {
    inner: Weak<StateInner<T>>,
    id: u64,
}

impl<T> Drop for WatcherRegistration<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.watchers.borrow_mut().remove(&self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_latest_value() {
        let state = MutableState::new(1);
        assert_eq!(state.get(), 1);
        state.set(5);
        assert_eq!(state.get(), 5);
    }

    #[test]
    fn watcher_sees_every_set() {
        let state = MutableState::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = Rc::clone(&seen);
        let _registration = state.watch(move |value| seen_clone.borrow_mut().push(*value));
        state.set(1);
        state.set(2);

        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn dropped_registration_stops_notifications() {
        let state = MutableState::new(0);
        let count = Cell::new(0);
        let count = Rc::new(count);

        let count_clone = Rc::clone(&count);
        let registration = state.watch(move |_| count_clone.set(count_clone.get() + 1));
        state.set(1);
        drop(registration);
        state.set(2);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn read_only_view_tracks_writer() {
        let state = MutableState::new("home");
        let view = state.as_state();
        state.set("about");
        assert_eq!(view.get(), "about");
    }
}
