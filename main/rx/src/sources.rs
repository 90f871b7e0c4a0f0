use crate::{Observable, Subscriber};

/// Emits a single value, then completes.
pub fn just<T: 'static>(value: T) -> Just<T> {
    Just { value }
}

/// Emits all values of the given iterable in order, then completes.
pub fn from_iter<I>(iterable: I) -> FromIter<I>
where
    I: IntoIterator + 'static,
    I::Item: 'static,
{
    FromIter { iterable }
}

pub struct Just<T> {
    value: T,
}

impl<T: 'static> Observable for Just<T> {
    type Item = T;

    fn actual_subscribe(self, subscriber: Subscriber<T>) {
        subscriber.next(self.value);
        subscriber.complete();
    }
}

pub struct FromIter<I> {
    iterable: I,
}

impl<I> Observable for FromIter<I>
where
    I: IntoIterator + 'static,
    I::Item: 'static,
{
    type Item = I::Item;

    fn actual_subscribe(self, subscriber: Subscriber<I::Item>) {
        for value in self.iterable {
            if subscriber.is_closed() {
                return;
            }
            subscriber.next(value);
        }
        subscriber.complete();
    }
}
