use crate::{Observable, Observer, Scheduler, Subscriber, Subscription};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Emits the most recent value once a quiet period without new values has passed.
pub struct Debounce<S, Sch> {
    source: S,
    interval: Duration,
    scheduler: Sch,
}

impl<S, Sch> Debounce<S, Sch> {
    pub(crate) fn new(source: S, interval: Duration, scheduler: Sch) -> Debounce<S, Sch> {
        Debounce {
            source,
            interval,
            scheduler,
        }
    }
}

impl<S, Sch> Observable for Debounce<S, Sch>
where
    S: Observable,
    Sch: Scheduler + 'static,
{
    type Item = S::Item;

    fn actual_subscribe(self, subscriber: Subscriber<S::Item>) {
        let subscription = subscriber.subscription().clone();
        let state = Rc::new(RefCell::new(DebounceState {
            pending: None,
            timer: None,
        }));
        {
            // A pending emission must not survive cancellation
            let state = state.clone();
            subscription.add_teardown(move || {
                let timer = state.borrow_mut().timer.take();
                if let Some(timer) = timer {
                    timer.unsubscribe();
                }
            });
        }
        let observer = DebounceObserver {
            downstream: subscriber,
            interval: self.interval,
            scheduler: self.scheduler,
            state,
        };
        self.source
            .actual_subscribe(Subscriber::with_subscription(observer, subscription));
    }
}

struct DebounceState<T> {
    pending: Option<T>,
    timer: Option<Subscription>,
}

struct DebounceObserver<T, Sch> {
    downstream: Subscriber<T>,
    interval: Duration,
    scheduler: Sch,
    state: Rc<RefCell<DebounceState<T>>>,
}

impl<T, Sch> DebounceObserver<T, Sch> {
    fn take_timer(&self) -> Option<Subscription> {
        self.state.borrow_mut().timer.take()
    }
}

impl<T: 'static, Sch: Scheduler> Observer<T> for DebounceObserver<T, Sch> {
    fn next(&mut self, value: T) {
        if let Some(timer) = self.take_timer() {
            timer.unsubscribe();
        }
        self.state.borrow_mut().pending = Some(value);
        let state = self.state.clone();
        let downstream = self.downstream.clone();
        let timer = self.scheduler.schedule(
            Some(self.interval),
            Box::new(move || {
                let value = {
                    let mut state = state.borrow_mut();
                    state.timer = None;
                    state.pending.take()
                };
                if let Some(value) = value {
                    downstream.next(value);
                }
            }),
        );
        self.state.borrow_mut().timer = Some(timer);
    }

    fn complete(&mut self) {
        if let Some(timer) = self.take_timer() {
            timer.unsubscribe();
        }
        let pending = self.state.borrow_mut().pending.take();
        if let Some(value) = pending {
            self.downstream.next(value);
        }
        self.downstream.complete();
    }
}
