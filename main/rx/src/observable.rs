use crate::{
    CancellationHandle, CombineLatest, Completion, Debounce, Filter, Map, Merge, Observer,
    Scheduler, SinkObserver, Subscriber, Subscription,
};
use std::time::Duration;

/// A source of values which can be subscribed to.
///
/// Observables are cold descriptions of a pipeline: nothing happens until someone subscribes.
/// Operators consume `self` and wrap it, just like iterator adapters do.
pub trait Observable: Sized + 'static {
    type Item: 'static;

    /// Starts emitting to the given subscriber.
    ///
    /// Implementations must stop emitting as soon as the subscriber is closed.
    fn actual_subscribe(self, subscriber: Subscriber<Self::Item>);

    /// Subscribes the given observer and returns the subscription for closing it.
    fn subscribe(self, observer: impl Observer<Self::Item> + 'static) -> Subscription {
        let subscriber = Subscriber::new(observer);
        let subscription = subscriber.subscription().clone();
        self.actual_subscribe(subscriber);
        subscription
    }

    /// Subscribes with a closure that receives each value.
    ///
    /// The returned handle must be kept alive, dropping it cancels the subscription.
    fn sink(self, on_next: impl FnMut(Self::Item) + 'static) -> CancellationHandle {
        self.sink_with_completion(on_next, |_| {})
    }

    fn sink_with_completion(
        self,
        on_next: impl FnMut(Self::Item) + 'static,
        on_completion: impl FnMut(Completion) + 'static,
    ) -> CancellationHandle {
        CancellationHandle::new(self.subscribe(SinkObserver::new(on_next, on_completion)))
    }

    fn map<U, F>(self, f: F) -> Map<Self, F, U>
    where
        U: 'static,
        F: FnMut(Self::Item) -> U + 'static,
    {
        Map::new(self, f)
    }

    fn filter<F>(self, predicate: F) -> Filter<Self, F>
    where
        F: FnMut(&Self::Item) -> bool + 'static,
    {
        Filter::new(self, predicate)
    }

    /// Interleaves the values of both observables. Completes once both completed.
    fn merge<O>(self, other: O) -> Merge<Self, O>
    where
        O: Observable<Item = Self::Item>,
    {
        Merge::new(self, other)
    }

    /// Emits the latest value of each side whenever one side emits, as soon as both sides
    /// emitted at least once.
    fn combine_latest<O>(self, other: O) -> CombineLatest<Self, O>
    where
        O: Observable,
        Self::Item: Clone,
        O::Item: Clone,
    {
        CombineLatest::new(self, other)
    }

    /// Emits a value only after `interval` passed without another value arriving.
    fn debounce<S>(self, interval: Duration, scheduler: S) -> Debounce<Self, S>
    where
        S: Scheduler + 'static,
    {
        Debounce::new(self, interval, scheduler)
    }
}
