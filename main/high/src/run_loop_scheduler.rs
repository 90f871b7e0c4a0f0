//! Provides a scheduler for running time-based operators on the main thread run loop.
use crate::TaskSupport;
use gallery_rx::{Scheduler, SchedulerTask, Subscription};
use std::time::Duration;
use tracing::warn;

/// Schedules tasks as main thread tasks, so they run whenever the `MainTaskMiddleware` is pumped.
///
/// Only usable from the main thread because tasks don't need to be `Send`.
#[derive(Clone, Debug)]
pub struct RunLoopScheduler {
    task_support: TaskSupport,
}

impl RunLoopScheduler {
    pub fn new(task_support: TaskSupport) -> RunLoopScheduler {
        RunLoopScheduler { task_support }
    }
}

impl Scheduler for RunLoopScheduler {
    fn schedule(&self, delay: Option<Duration>, task: SchedulerTask) -> Subscription {
        let subscription = Subscription::new();
        let guard = subscription.clone();
        let wrapped = move || {
            if !guard.is_closed() {
                task();
                // One-shot
                guard.unsubscribe();
            }
        };
        let result = match delay {
            Some(delay) => self
                .task_support
                .do_later_in_main_thread_from_main_thread(delay, wrapped),
            None => self
                .task_support
                .do_later_in_main_thread_from_main_thread_asap(wrapped),
        };
        if let Err(e) = result {
            warn!(msg = "Couldn't schedule task", error = %e);
            subscription.unsubscribe();
        }
        subscription
    }
}
