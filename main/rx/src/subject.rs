use crate::{Observable, Subscriber};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Hot observable which broadcasts manually sent values to its current subscribers.
///
/// Cloning gives another handle to the same subject. Subscribers which subscribe after
/// [`complete()`](Self::complete) was called are completed immediately.
pub struct PassthroughSubject<T> {
    inner: Rc<RefCell<SubjectInner<T>>>,
}

struct SubjectInner<T> {
    subscribers: Vec<Subscriber<T>>,
    completed: bool,
}

impl<T> Clone for PassthroughSubject<T> {
    fn clone(&self) -> Self {
        PassthroughSubject {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + 'static> Default for PassthroughSubject<T> {
    fn default() -> Self {
        PassthroughSubject::new()
    }
}

impl<T> fmt::Debug for PassthroughSubject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PassthroughSubject")
            .field("subscriber_count", &inner.subscribers.len())
            .field("completed", &inner.completed)
            .finish()
    }
}

impl<T: Clone + 'static> PassthroughSubject<T> {
    pub fn new() -> PassthroughSubject<T> {
        PassthroughSubject {
            inner: Rc::new(RefCell::new(SubjectInner {
                subscribers: Vec::new(),
                completed: false,
            })),
        }
    }

    /// Sends the value to all live subscribers in subscription order.
    pub fn send(&self, value: T) {
        for subscriber in self.live_subscribers() {
            subscriber.next(value.clone());
        }
    }

    pub fn complete(&self) {
        let subscribers = {
            let mut inner = self.inner.borrow_mut();
            if inner.completed {
                return;
            }
            inner.completed = true;
            std::mem::take(&mut inner.subscribers)
        };
        for subscriber in subscribers {
            subscriber.complete();
        }
    }

    /// Number of subscribers which are still listening.
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| !s.is_closed())
            .count()
    }

    // Cancelled subscribers are pruned lazily here. Subscribers are collected first so that
    // observers are free to send to or subscribe to this subject while being notified.
    fn live_subscribers(&self) -> Vec<Subscriber<T>> {
        let mut inner = self.inner.borrow_mut();
        inner.subscribers.retain(|s| !s.is_closed());
        inner.subscribers.clone()
    }
}

impl<T: Clone + 'static> Observable for PassthroughSubject<T> {
    type Item = T;

    fn actual_subscribe(self, subscriber: Subscriber<T>) {
        let completed = self.inner.borrow().completed;
        if completed {
            subscriber.complete();
            return;
        }
        self.inner.borrow_mut().subscribers.push(subscriber);
    }
}

/// Subject which holds a current value, emits it to every new subscriber and then broadcasts
/// changes.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each value-changing `send()` and on each `modify()`.
/// 2. Sending a value equal to the current value is a no-op.
/// 3. Subscribers are notified in subscription order.
pub struct CurrentValueSubject<T> {
    inner: Rc<RefCell<CurrentValueInner<T>>>,
}

struct CurrentValueInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Subscriber<T>>,
}

impl<T> Clone for CurrentValueSubject<T> {
    fn clone(&self) -> Self {
        CurrentValueSubject {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for CurrentValueSubject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("CurrentValueSubject")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> CurrentValueSubject<T> {
    pub fn new(value: T) -> CurrentValueSubject<T> {
        CurrentValueSubject {
            inner: Rc::new(RefCell::new(CurrentValueInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn value(&self) -> T {
        self.inner.borrow().value.clone()
    }

    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    pub fn send(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Modifies the value in place and notifies subscribers.
    ///
    /// Unlike `send()`, this doesn't compare against the previous value. Meant for mutations
    /// which are known to change the value, e.g. appending to a collection.
    pub fn modify(&self, f: impl FnOnce(&mut T)) {
        {
            let mut inner = self.inner.borrow_mut();
            f(&mut inner.value);
            inner.version += 1;
        }
        self.notify();
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| !s.is_closed())
            .count()
    }

    fn notify(&self) {
        let (value, subscribers) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|s| !s.is_closed());
            (inner.value.clone(), inner.subscribers.clone())
        };
        for subscriber in subscribers {
            subscriber.next(value.clone());
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable for CurrentValueSubject<T> {
    type Item = T;

    fn actual_subscribe(self, subscriber: Subscriber<T>) {
        let value = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.push(subscriber.clone());
            inner.value.clone()
        };
        subscriber.next(value);
    }
}
