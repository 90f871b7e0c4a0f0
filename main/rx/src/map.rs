use crate::{Observable, Observer, Subscriber};
use std::marker::PhantomData;

/// Transforms each value with a function.
pub struct Map<S, F, U> {
    source: S,
    f: F,
    p: PhantomData<fn() -> U>,
}

impl<S, F, U> Map<S, F, U> {
    pub(crate) fn new(source: S, f: F) -> Map<S, F, U> {
        Map {
            source,
            f,
            p: PhantomData,
        }
    }
}

impl<S, F, U> Observable for Map<S, F, U>
where
    S: Observable,
    F: FnMut(S::Item) -> U + 'static,
    U: 'static,
{
    type Item = U;

    fn actual_subscribe(self, subscriber: Subscriber<U>) {
        let subscription = subscriber.subscription().clone();
        let observer = MapObserver {
            f: self.f,
            downstream: subscriber,
        };
        self.source
            .actual_subscribe(Subscriber::with_subscription(observer, subscription));
    }
}

struct MapObserver<F, U> {
    f: F,
    downstream: Subscriber<U>,
}

impl<T, F, U> Observer<T> for MapObserver<F, U>
where
    F: FnMut(T) -> U,
    U: 'static,
{
    fn next(&mut self, value: T) {
        let mapped = (self.f)(value);
        self.downstream.next(mapped);
    }

    fn complete(&mut self) {
        self.downstream.complete();
    }
}
