use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

type Teardown = Box<dyn FnOnce()>;

/// Shared state of one subscription.
///
/// Cloning a `Subscription` hands out another reference to the **same** state. Closing it through
/// any clone runs all registered teardown logic exactly once, so `unsubscribe()` is safe to call
/// any number of times.
#[derive(Clone, Default)]
pub struct Subscription {
    inner: Rc<SubscriptionInner>,
}

#[derive(Default)]
struct SubscriptionInner {
    closed: Cell<bool>,
    teardowns: RefCell<Vec<Teardown>>,
}

impl Subscription {
    pub fn new() -> Subscription {
        Default::default()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    /// Registers logic to be executed when this subscription gets closed.
    ///
    /// If the subscription is already closed, the teardown is executed immediately.
    pub fn add_teardown(&self, teardown: impl FnOnce() + 'static) {
        if self.is_closed() {
            teardown();
            return;
        }
        self.inner.teardowns.borrow_mut().push(Box::new(teardown));
    }

    /// Makes the given subscription a child of this one: closing this one closes the child as
    /// well. Closing the child doesn't affect this one.
    pub fn add(&self, child: Subscription) {
        if Rc::ptr_eq(&self.inner, &child.inner) {
            return;
        }
        self.add_teardown(move || child.unsubscribe());
    }

    pub fn unsubscribe(&self) {
        if self.inner.closed.replace(true) {
            return;
        }
        // Taken out first because teardowns may register further teardowns (which then run
        // immediately).
        let teardowns = std::mem::take(&mut *self.inner.teardowns.borrow_mut());
        for teardown in teardowns {
            teardown();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .field("teardown_count", &self.inner.teardowns.borrow().len())
            .finish()
    }
}

/// Owned cancellation token for an active subscription.
///
/// Calling [`cancel()`](Self::cancel) stops further emissions. It's idempotent. Dropping the
/// handle cancels as well, so whoever wants the pipeline to stay alive must hold on to it.
#[must_use = "dropping a CancellationHandle cancels the subscription"]
pub struct CancellationHandle {
    subscription: Subscription,
}

impl CancellationHandle {
    pub fn new(subscription: Subscription) -> CancellationHandle {
        CancellationHandle { subscription }
    }

    pub fn cancel(&self) {
        self.subscription.unsubscribe();
    }

    pub fn is_cancelled(&self) -> bool {
        self.subscription.is_closed()
    }

    /// Gives access to the underlying subscription, e.g. in order to tie additional work to the
    /// lifetime of this handle.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn store_in(self, bag: &mut CancellationBag) {
        bag.insert(self);
    }
}

impl From<Subscription> for CancellationHandle {
    fn from(subscription: Subscription) -> Self {
        CancellationHandle::new(subscription)
    }
}

impl Drop for CancellationHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for CancellationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Keeps any number of cancellation handles alive until they are cancelled together.
#[derive(Debug, Default)]
pub struct CancellationBag {
    handles: Vec<CancellationHandle>,
}

impl CancellationBag {
    pub fn new() -> CancellationBag {
        Default::default()
    }

    pub fn insert(&mut self, handle: CancellationHandle) {
        self.handles.push(handle);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Cancels and releases all contained handles.
    pub fn cancel_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsubscribe_runs_teardowns_once() {
        let count = Rc::new(Cell::new(0));
        let subscription = Subscription::new();
        let c = count.clone();
        subscription.add_teardown(move || c.set(c.get() + 1));
        subscription.unsubscribe();
        subscription.unsubscribe();
        assert!(subscription.is_closed());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn teardown_added_after_close_runs_immediately() {
        let subscription = Subscription::new();
        subscription.unsubscribe();
        let executed = Rc::new(Cell::new(false));
        let e = executed.clone();
        subscription.add_teardown(move || e.set(true));
        assert!(executed.get());
    }

    #[test]
    fn closing_parent_closes_child_but_not_vice_versa() {
        let parent = Subscription::new();
        let first = Subscription::new();
        let second = Subscription::new();
        parent.add(first.clone());
        parent.add(second.clone());
        first.unsubscribe();
        assert!(!parent.is_closed());
        parent.unsubscribe();
        assert!(second.is_closed());
    }

    #[test]
    fn adding_itself_as_child_is_ignored() {
        let subscription = Subscription::new();
        subscription.add(subscription.clone());
        subscription.unsubscribe();
        assert!(subscription.is_closed());
    }

    #[test]
    fn handle_cancel_is_idempotent() {
        let handle = CancellationHandle::new(Subscription::new());
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn dropping_handle_cancels() {
        let subscription = Subscription::new();
        drop(CancellationHandle::from(subscription.clone()));
        assert!(subscription.is_closed());
    }

    #[test]
    fn bag_cancels_everything() {
        let mut bag = CancellationBag::new();
        let a = Subscription::new();
        let b = Subscription::new();
        CancellationHandle::new(a.clone()).store_in(&mut bag);
        bag.insert(CancellationHandle::new(b.clone()));
        assert_eq!(bag.len(), 2);
        bag.cancel_all();
        assert!(bag.is_empty());
        assert!(a.is_closed());
        assert!(b.is_closed());
        // Nothing left, second call is a no-op
        bag.cancel_all();
    }
}
