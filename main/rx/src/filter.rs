use crate::{Observable, Observer, Subscriber};

/// Lets through only values matching a predicate.
pub struct Filter<S, F> {
    source: S,
    predicate: F,
}

impl<S, F> Filter<S, F> {
    pub(crate) fn new(source: S, predicate: F) -> Filter<S, F> {
        Filter { source, predicate }
    }
}

impl<S, F> Observable for Filter<S, F>
where
    S: Observable,
    F: FnMut(&S::Item) -> bool + 'static,
{
    type Item = S::Item;

    fn actual_subscribe(self, subscriber: Subscriber<S::Item>) {
        let subscription = subscriber.subscription().clone();
        let observer = FilterObserver {
            predicate: self.predicate,
            downstream: subscriber,
        };
        self.source
            .actual_subscribe(Subscriber::with_subscription(observer, subscription));
    }
}

struct FilterObserver<F, T> {
    predicate: F,
    downstream: Subscriber<T>,
}

impl<T, F> Observer<T> for FilterObserver<F, T>
where
    F: FnMut(&T) -> bool,
    T: 'static,
{
    fn next(&mut self, value: T) {
        if (self.predicate)(&value) {
            self.downstream.next(value);
        }
    }

    fn complete(&mut self) {
        self.downstream.complete();
    }
}
