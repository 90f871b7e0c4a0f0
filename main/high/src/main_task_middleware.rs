use crossbeam_channel::{Receiver, Sender};

use crate::{GalleryError, GalleryResult};
use fragile::Fragile;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};
use tracing::warn;

pub const DEFAULT_MAIN_THREAD_TASK_CHANNEL_CAPACITY: usize = 1000;
pub const DEFAULT_MAIN_THREAD_TASK_BULK_SIZE: usize = 100;

/// Creates a connected pair of task support (for enqueuing) and middleware (for executing).
///
/// Must be called from the thread which is going to pump the middleware. That thread is
/// considered the main thread from then on.
pub fn new_main_task_queue(
    capacity: usize,
    bulk_size: usize,
) -> (TaskSupport, MainTaskMiddleware) {
    let (sender, receiver) = crossbeam_channel::bounded(capacity);
    let task_support = TaskSupport {
        sender: sender.clone(),
        main_thread_id: thread::current().id(),
    };
    let middleware = MainTaskMiddleware {
        main_thread_task_sender: sender,
        main_thread_task_receiver: receiver,
        bulk_size,
    };
    (task_support, middleware)
}

/// Cloneable handle for getting work done in the main thread.
#[derive(Clone, Debug)]
pub struct TaskSupport {
    sender: Sender<MainThreadTask>,
    main_thread_id: ThreadId,
}

impl TaskSupport {
    pub fn is_in_main_thread(&self) -> bool {
        thread::current().id() == self.main_thread_id
    }

    /// Enqueues the operation for execution as soon as the middleware is pumped next.
    ///
    /// `Send` is not required, which is perfect for capturing `Rc`s. In return, this must be
    /// called from the main thread. Fails if the task queue is full (typically if nobody pumps the
    /// middleware anymore).
    pub fn do_later_in_main_thread_from_main_thread_asap(
        &self,
        op: impl FnOnce() + 'static,
    ) -> GalleryResult<()> {
        self.require_main_thread()?;
        self.enqueue(MainThreadTask::new(op, None))
    }

    /// Like `do_later_in_main_thread_from_main_thread_asap()` but not before `waiting_time`
    /// passed.
    pub fn do_later_in_main_thread_from_main_thread(
        &self,
        waiting_time: Duration,
        op: impl FnOnce() + 'static,
    ) -> GalleryResult<()> {
        self.require_main_thread()?;
        self.enqueue(MainThreadTask::new(op, Some(Instant::now() + waiting_time)))
    }

    fn require_main_thread(&self) -> GalleryResult<()> {
        if self.is_in_main_thread() {
            Ok(())
        } else {
            Err(GalleryError::NotInMainThread)
        }
    }

    fn enqueue(&self, task: MainThreadTask) -> GalleryResult<()> {
        self.sender.try_send(task)?;
        Ok(())
    }
}

/// Executes queued main thread tasks whenever it is pumped.
#[derive(Debug)]
pub struct MainTaskMiddleware {
    main_thread_task_sender: Sender<MainThreadTask>,
    main_thread_task_receiver: Receiver<MainThreadTask>,
    bulk_size: usize,
}

impl MainTaskMiddleware {
    pub fn reset(&self) {
        self.discard_tasks();
    }

    pub fn pending_count(&self) -> usize {
        self.main_thread_task_receiver.len()
    }

    fn discard_tasks(&self) {
        let task_count = self.main_thread_task_receiver.try_iter().count();
        if task_count > 0 {
            warn!(msg = "Discarded main thread tasks on reset", task_count);
        }
    }

    /// Executes due tasks (at most one bulk) and returns how many were executed.
    ///
    /// Tasks which are not due yet go back to the end of the queue.
    pub fn run(&mut self) -> usize {
        let now = Instant::now();
        let tasks: Vec<_> = self
            .main_thread_task_receiver
            .try_iter()
            .take(self.bulk_size)
            .collect();
        let mut executed_count = 0;
        for task in tasks {
            match task.desired_execution_time {
                Some(t) if now < t => {
                    if self.main_thread_task_sender.try_send(task).is_err() {
                        warn!(msg = "Couldn't reschedule main thread task, dropping it");
                    }
                }
                _ => {
                    task.execute();
                    executed_count += 1;
                }
            }
        }
        executed_count
    }
}

pub struct MainThreadTask {
    desired_execution_time: Option<Instant>,
    // Created in the main thread and executed there, so it can cross the channel without `Send`.
    op: Fragile<Box<dyn FnOnce() + 'static>>,
}

impl MainThreadTask {
    fn new(op: impl FnOnce() + 'static, desired_execution_time: Option<Instant>) -> MainThreadTask {
        MainThreadTask {
            desired_execution_time,
            op: Fragile::new(Box::new(op)),
        }
    }

    fn execute(self) {
        (self.op.into_inner())();
    }
}

impl std::fmt::Debug for MainThreadTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainThreadTask")
            .field("desired_execution_time", &self.desired_execution_time)
            .finish_non_exhaustive()
    }
}
