use crate::{Completion, Observable, Observer, SinkObserver, Subscriber, Subscription};
use std::cell::RefCell;
use std::rc::Rc;

/// Combines the latest values of two observables into tuples.
pub struct CombineLatest<A, B> {
    left: A,
    right: B,
}

impl<A, B> CombineLatest<A, B> {
    pub(crate) fn new(left: A, right: B) -> CombineLatest<A, B> {
        CombineLatest { left, right }
    }
}

struct CombineState<L, R> {
    left: Option<L>,
    right: Option<R>,
    completed_sides: usize,
}

impl<L: Clone, R: Clone> CombineState<L, R> {
    fn latest(&self) -> Option<(L, R)> {
        match (&self.left, &self.right) {
            (Some(l), Some(r)) => Some((l.clone(), r.clone())),
            _ => None,
        }
    }

    /// A side which completes without ever having emitted makes a combination impossible, so the
    /// whole thing is finished then. Otherwise it's finished when both sides are.
    fn complete_side(&mut self, side_emitted: bool) -> bool {
        self.completed_sides += 1;
        !side_emitted || self.completed_sides == 2
    }
}

impl<A, B> Observable for CombineLatest<A, B>
where
    A: Observable,
    B: Observable,
    A::Item: Clone,
    B::Item: Clone,
{
    type Item = (A::Item, B::Item);

    fn actual_subscribe(self, subscriber: Subscriber<(A::Item, B::Item)>) {
        let state = Rc::new(RefCell::new(CombineState {
            left: None,
            right: None,
            completed_sides: 0,
        }));
        let left = {
            let next_state = state.clone();
            let complete_state = state.clone();
            let next_downstream = subscriber.clone();
            let complete_downstream = subscriber.clone();
            SinkObserver::new(
                move |value: A::Item| {
                    let combined = {
                        let mut state = next_state.borrow_mut();
                        state.left = Some(value);
                        state.latest()
                    };
                    if let Some(combined) = combined {
                        next_downstream.next(combined);
                    }
                },
                move |_: Completion| {
                    let finished = {
                        let mut state = complete_state.borrow_mut();
                        let emitted = state.left.is_some();
                        state.complete_side(emitted)
                    };
                    if finished {
                        complete_downstream.complete();
                    }
                },
            )
        };
        let right = {
            let next_state = state.clone();
            let complete_state = state;
            let next_downstream = subscriber.clone();
            let complete_downstream = subscriber.clone();
            SinkObserver::new(
                move |value: B::Item| {
                    let combined = {
                        let mut state = next_state.borrow_mut();
                        state.right = Some(value);
                        state.latest()
                    };
                    if let Some(combined) = combined {
                        next_downstream.next(combined);
                    }
                },
                move |_: Completion| {
                    let finished = {
                        let mut state = complete_state.borrow_mut();
                        let emitted = state.right.is_some();
                        state.complete_side(emitted)
                    };
                    if finished {
                        complete_downstream.complete();
                    }
                },
            )
        };
        self.left
            .actual_subscribe(child_subscriber(&subscriber, left));
        if subscriber.is_closed() {
            return;
        }
        self.right
            .actual_subscribe(child_subscriber(&subscriber, right));
    }
}

fn child_subscriber<T: 'static, D: 'static>(
    downstream: &Subscriber<D>,
    observer: impl Observer<T> + 'static,
) -> Subscriber<T> {
    let child = Subscription::new();
    downstream.subscription().add(child.clone());
    Subscriber::with_subscription(observer, child)
}

#[cfg(test)]
mod tests {
    use crate::{from_iter, just, Observable, PassthroughSubject};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn emits_only_after_both_sides_emitted() {
        let numbers = PassthroughSubject::<i32>::new();
        let letters = PassthroughSubject::<String>::new();
        let values = Rc::new(RefCell::new(Vec::new()));
        let v = values.clone();
        let _handle = numbers
            .clone()
            .combine_latest(letters.clone())
            .sink(move |(n, l)| v.borrow_mut().push(format!("({n}, {l})")));
        numbers.send(1);
        assert!(values.borrow().is_empty());
        letters.send("A".to_string());
        letters.send("B".to_string());
        numbers.send(2);
        assert_eq!(*values.borrow(), vec!["(1, A)", "(1, B)", "(2, B)"]);
    }

    #[test]
    fn completes_when_both_sides_completed() {
        let completed = Rc::new(RefCell::new(0));
        let c = completed.clone();
        let values = Rc::new(RefCell::new(Vec::new()));
        let v = values.clone();
        let _handle = from_iter([1, 2])
            .combine_latest(just("x"))
            .sink_with_completion(
                move |pair| v.borrow_mut().push(pair),
                move |_| *c.borrow_mut() += 1,
            );
        // Left side is exhausted before right side emits, so only the last left value pairs up
        assert_eq!(*values.borrow(), vec![(2, "x")]);
        assert_eq!(*completed.borrow(), 1);
    }

    #[test]
    fn completes_early_if_one_side_never_emitted() {
        let left = PassthroughSubject::<i32>::new();
        let right = PassthroughSubject::<i32>::new();
        let completed = Rc::new(RefCell::new(false));
        let c = completed.clone();
        let _handle = left
            .clone()
            .combine_latest(right.clone())
            .sink_with_completion(|_| {}, move |_| *c.borrow_mut() = true);
        left.send(1);
        right.complete();
        assert!(*completed.borrow());
    }
}
