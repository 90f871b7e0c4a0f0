use crate::{Observable, Observer, Subscriber, Subscription};
use std::cell::Cell;
use std::rc::Rc;

/// Interleaves two observables of the same item type.
pub struct Merge<A, B> {
    first: A,
    second: B,
}

impl<A, B> Merge<A, B> {
    pub(crate) fn new(first: A, second: B) -> Merge<A, B> {
        Merge { first, second }
    }
}

impl<A, B> Observable for Merge<A, B>
where
    A: Observable,
    B: Observable<Item = A::Item>,
{
    type Item = A::Item;

    fn actual_subscribe(self, subscriber: Subscriber<A::Item>) {
        let remaining = Rc::new(Cell::new(2));
        self.first
            .actual_subscribe(inner_subscriber(&subscriber, &remaining));
        if subscriber.is_closed() {
            return;
        }
        self.second
            .actual_subscribe(inner_subscriber(&subscriber, &remaining));
    }
}

/// Each source gets its own child subscription so that one source completing doesn't close the
/// other one.
fn inner_subscriber<T: 'static>(
    downstream: &Subscriber<T>,
    remaining: &Rc<Cell<usize>>,
) -> Subscriber<T> {
    let child = Subscription::new();
    downstream.subscription().add(child.clone());
    let observer = MergeObserver {
        downstream: downstream.clone(),
        remaining: remaining.clone(),
    };
    Subscriber::with_subscription(observer, child)
}

struct MergeObserver<T> {
    downstream: Subscriber<T>,
    remaining: Rc<Cell<usize>>,
}

impl<T: 'static> Observer<T> for MergeObserver<T> {
    fn next(&mut self, value: T) {
        self.downstream.next(value);
    }

    fn complete(&mut self) {
        let remaining = self.remaining.get().saturating_sub(1);
        self.remaining.set(remaining);
        if remaining == 0 {
            self.downstream.complete();
        }
    }
}
