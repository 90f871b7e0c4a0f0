use crate::Subscription;
use derive_more::Display;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Receiving end of a stream.
pub trait Observer<T> {
    fn next(&mut self, value: T);

    fn complete(&mut self);
}

/// How a stream ended.
///
/// Streams in this crate can't fail, so there's just one variant for now.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum Completion {
    #[display(fmt = "finished")]
    Finished,
}

/// An observer bound to a subscription.
///
/// This is what sources and operators emit to. Once the subscription is closed (because the
/// stream completed or because someone cancelled), all further emissions are swallowed.
pub struct Subscriber<T> {
    // This is a RefCell. So calling next() on the same subscriber while another next() is still
    // running will panic. That's a bug in the subscriber graph and it's better to notice it.
    observer: Rc<RefCell<dyn Observer<T>>>,
    subscription: Subscription,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Subscriber {
            observer: self.observer.clone(),
            subscription: self.subscription.clone(),
        }
    }
}

impl<T> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("subscription", &self.subscription)
            .finish()
    }
}

impl<T: 'static> Subscriber<T> {
    pub fn new(observer: impl Observer<T> + 'static) -> Subscriber<T> {
        Subscriber::with_subscription(observer, Subscription::new())
    }

    /// Creates a subscriber which shares the given subscription, e.g. the one of a downstream
    /// subscriber, so that cancelling downstream also closes this one.
    pub fn with_subscription(
        observer: impl Observer<T> + 'static,
        subscription: Subscription,
    ) -> Subscriber<T> {
        Subscriber {
            observer: Rc::new(RefCell::new(observer)),
            subscription,
        }
    }

    pub fn next(&self, value: T) {
        if self.subscription.is_closed() {
            return;
        }
        self.observer.borrow_mut().next(value);
    }

    pub fn complete(&self) {
        if self.subscription.is_closed() {
            return;
        }
        self.observer.borrow_mut().complete();
        self.subscription.unsubscribe();
    }

    pub fn is_closed(&self) -> bool {
        self.subscription.is_closed()
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

/// Observer made of two closures, one for values and one for the completion.
pub struct SinkObserver<N, C> {
    on_next: N,
    on_completion: C,
}

impl<N, C> SinkObserver<N, C> {
    pub fn new(on_next: N, on_completion: C) -> SinkObserver<N, C> {
        SinkObserver {
            on_next,
            on_completion,
        }
    }
}

impl<T, N, C> Observer<T> for SinkObserver<N, C>
where
    N: FnMut(T),
    C: FnMut(Completion),
{
    fn next(&mut self, value: T) {
        (self.on_next)(value);
    }

    fn complete(&mut self) {
        (self.on_completion)(Completion::Finished);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_subscriber() -> (Subscriber<i32>, Rc<RefCell<Vec<String>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let on_next = events.clone();
        let on_completion = events.clone();
        let subscriber = Subscriber::new(SinkObserver::new(
            move |v: i32| on_next.borrow_mut().push(v.to_string()),
            move |c: Completion| on_completion.borrow_mut().push(c.to_string()),
        ));
        (subscriber, events)
    }

    #[test]
    fn completion_closes_subscriber() {
        let (subscriber, events) = recording_subscriber();
        subscriber.next(1);
        subscriber.complete();
        subscriber.next(2);
        subscriber.complete();
        assert!(subscriber.is_closed());
        assert_eq!(*events.borrow(), vec!["1", "finished"]);
    }

    #[test]
    fn cancelled_subscriber_receives_nothing() {
        let (subscriber, events) = recording_subscriber();
        subscriber.subscription().unsubscribe();
        subscriber.next(1);
        subscriber.complete();
        assert!(events.borrow().is_empty());
    }
}
