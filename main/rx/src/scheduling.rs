//! Provides the scheduler abstraction for time-based operators plus a virtual-time scheduler.
use crate::Subscription;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tracing::trace;

pub type SchedulerTask = Box<dyn FnOnce()>;

/// Executes tasks later, optionally after a delay.
pub trait Scheduler {
    /// Schedules the given task. Closing the returned subscription before the task ran prevents
    /// it from running.
    fn schedule(&self, delay: Option<Duration>, task: SchedulerTask) -> Subscription;
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn schedule(&self, delay: Option<Duration>, task: SchedulerTask) -> Subscription {
        (**self).schedule(delay, task)
    }
}

/// Scheduler with a logical clock which only moves forward when told to.
///
/// Tasks due at the same instant run in the order they were scheduled. Cloning gives another
/// handle to the same clock and queue.
#[derive(Clone, Default)]
pub struct VirtualTimeScheduler {
    inner: Rc<RefCell<VirtualTimeInner>>,
}

#[derive(Default)]
struct VirtualTimeInner {
    now: Duration,
    next_seq: u64,
    queue: BTreeMap<(Duration, u64), ScheduledTask>,
}

struct ScheduledTask {
    task: SchedulerTask,
    subscription: Subscription,
}

impl VirtualTimeScheduler {
    pub fn new() -> VirtualTimeScheduler {
        Default::default()
    }

    /// Time elapsed since creation on the logical clock.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    pub fn advance_by(&self, delta: Duration) {
        let target = self.now() + delta;
        self.advance_to(target);
    }

    /// Moves the clock forward to `target`, running all tasks due until then (including tasks
    /// which get scheduled while advancing).
    pub fn advance_to(&self, target: Duration) {
        while let Some(scheduled) = self.pop_due(target) {
            if !scheduled.subscription.is_closed() {
                (scheduled.task)();
            }
        }
        let mut inner = self.inner.borrow_mut();
        inner.now = inner.now.max(target);
    }

    /// Runs until no more tasks are queued.
    pub fn run_until_idle(&self) {
        while let Some(due) = self.next_due() {
            self.advance_to(due);
        }
    }

    fn next_due(&self) -> Option<Duration> {
        let inner = self.inner.borrow();
        inner.queue.keys().next().map(|(due, _)| *due)
    }

    fn pop_due(&self, target: Duration) -> Option<ScheduledTask> {
        let mut inner = self.inner.borrow_mut();
        let due = inner.queue.keys().next().map(|(due, _)| *due)?;
        if due > target {
            return None;
        }
        let (_, scheduled) = inner.queue.pop_first()?;
        inner.now = inner.now.max(due);
        trace!(msg = "Running virtual-time task", due_ms = due.as_millis() as u64);
        Some(scheduled)
    }
}

impl Scheduler for VirtualTimeScheduler {
    fn schedule(&self, delay: Option<Duration>, task: SchedulerTask) -> Subscription {
        let subscription = Subscription::new();
        let key = {
            let mut inner = self.inner.borrow_mut();
            let due = inner.now + delay.unwrap_or_default();
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.queue.insert(
                (due, seq),
                ScheduledTask {
                    task,
                    subscription: subscription.clone(),
                },
            );
            (due, seq)
        };
        let queue = Rc::downgrade(&self.inner);
        subscription.add_teardown(move || {
            if let Some(inner) = queue.upgrade() {
                // Dropped only after releasing the borrow, the task might own handles whose
                // drop cancels (and thereby touches this queue) again.
                let removed = inner.borrow_mut().queue.remove(&key);
                drop(removed);
            }
        });
        subscription
    }
}

impl fmt::Debug for VirtualTimeScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("VirtualTimeScheduler")
            .field("now", &inner.now)
            .field("pending_count", &inner.queue.len())
            .finish()
    }
}
