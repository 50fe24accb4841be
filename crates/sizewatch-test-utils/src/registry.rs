use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sizewatch_core::Subscription;

/// One live registration.
struct Entry<K, C: ?Sized> {
    id: u64,
    key: K,
    active: Rc<Cell<bool>>,
    callback: Rc<C>,
}

struct Inner<K, C: ?Sized> {
    next_id: u64,
    entries: Vec<Entry<K, C>>,
    subscribed: usize,
    released: usize,
}

/// Shared bookkeeping behind both mock sources.
pub(crate) struct Registry<K, C: ?Sized> {
    inner: Rc<RefCell<Inner<K, C>>>,
}

impl<K, C: ?Sized> Clone for Registry<K, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: Clone + PartialEq + 'static, C: ?Sized + 'static> Registry<K, C> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                next_id: 0,
                entries: Vec::new(),
                subscribed: 0,
                released: 0,
            })),
        }
    }

    pub(crate) fn register(&self, key: K, callback: Rc<C>) -> Subscription {
        let active = Rc::new(Cell::new(true));
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribed += 1;
            inner.entries.push(Entry {
                id,
                key,
                active: Rc::clone(&active),
                callback,
            });
            id
        };

        let inner = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            active.set(false);
            if let Some(inner) = inner.upgrade() {
                let mut inner = inner.borrow_mut();
                inner.entries.retain(|entry| entry.id != id);
                inner.released += 1;
            }
        })
    }

    /// Callbacks registered for `key`, paired with their liveness flag.
    pub(crate) fn matching(&self, key: &K) -> Vec<(Rc<Cell<bool>>, Rc<C>)> {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.key == *key)
            .map(|entry| (Rc::clone(&entry.active), Rc::clone(&entry.callback)))
            .collect()
    }

    pub(crate) fn keys(&self) -> Vec<K> {
        self.inner
            .borrow()
            .entries
            .iter()
            .map(|entry| entry.key.clone())
            .collect()
    }

    pub(crate) fn active_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub(crate) fn subscribe_count(&self) -> usize {
        self.inner.borrow().subscribed
    }

    pub(crate) fn release_count(&self) -> usize {
        self.inner.borrow().released
    }
}
