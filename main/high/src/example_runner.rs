use crate::example::LogLine;
use crate::{Example, ExampleId, LogBuffer, LogSink, RecipeContext, Timing};
use crossbeam_channel::{Receiver, Sender};
use derivative::Derivative;
use gallery_rx::{CancellationBag, CancellationHandle, Scheduler, SchedulerTask, Subscription};
use std::rc::Rc;
use std::time::Duration;
use tracing::debug;

/// Shown instead of the output as long as there is none.
pub const OUTPUT_PLACEHOLDER: &str = "Click \"Run\" to see output…";

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RunnerState {
    Idle,
    Running { example: ExampleId },
}

/// Runs one example at a time and collects its log lines.
///
/// Lives on the UI thread. Log lines reach the buffer through a channel, so they are only appended
/// in `run()`, `reset()` and `pump()`. Lines of a superseded run are dropped there.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ExampleRunner {
    #[derivative(Debug = "ignore")]
    scheduler: Rc<dyn Scheduler>,
    timing: Timing,
    generation: u64,
    state: RunnerState,
    handles: CancellationBag,
    run_scope: Option<Subscription>,
    log_sender: Sender<LogLine>,
    log_receiver: Receiver<LogLine>,
    buffer: LogBuffer,
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct ExampleRunnerBuilder {
    #[derivative(Debug = "ignore")]
    scheduler: Rc<dyn Scheduler>,
    timing: Timing,
}

impl ExampleRunnerBuilder {
    pub fn timing(mut self, timing: Timing) -> ExampleRunnerBuilder {
        self.timing = timing;
        self
    }

    pub fn build(self) -> ExampleRunner {
        let (log_sender, log_receiver) = crossbeam_channel::unbounded();
        ExampleRunner {
            scheduler: self.scheduler,
            timing: self.timing,
            generation: 0,
            state: RunnerState::Idle,
            handles: CancellationBag::new(),
            run_scope: None,
            log_sender,
            log_receiver,
            buffer: LogBuffer::new(),
        }
    }
}

impl ExampleRunner {
    pub fn builder(scheduler: Rc<dyn Scheduler>) -> ExampleRunnerBuilder {
        ExampleRunnerBuilder {
            scheduler,
            timing: Default::default(),
        }
    }

    pub fn new(scheduler: Rc<dyn Scheduler>) -> ExampleRunner {
        Self::builder(scheduler).build()
    }

    /// Starts the given example, superseding whatever ran before.
    ///
    /// Lines the recipe logs synchronously are in the buffer when this returns.
    pub fn run(&mut self, example: &Example) {
        self.tear_down();
        self.buffer.clear();
        self.generation += 1;
        self.buffer.append(format!("Started: {}", example.title()));
        self.state = RunnerState::Running {
            example: example.id(),
        };
        debug!(
            msg = "Running example",
            example = %example.id(),
            generation = self.generation
        );
        let scope = Subscription::new();
        let scheduler = RunScopedScheduler {
            inner: self.scheduler.clone(),
            scope: scope.clone(),
        };
        let context = RecipeContext::new(
            LogSink::new(self.generation, self.log_sender.clone()),
            Rc::new(scheduler),
            self.timing,
        );
        self.run_scope = Some(scope);
        if let Some(handle) = example.execute(&context) {
            handle.store_in(&mut self.handles);
        }
        self.pump();
    }

    /// Cancels the current run (if any) and clears the output.
    pub fn reset(&mut self) {
        self.tear_down();
        self.generation += 1;
        self.buffer.clear();
        if self.state != RunnerState::Idle {
            debug!(msg = "Reset runner", generation = self.generation);
        }
        self.state = RunnerState::Idle;
        self.pump();
    }

    /// Moves log lines which arrived in the meantime into the buffer and returns how many.
    pub fn pump(&mut self) -> usize {
        let mut appended = 0;
        let mut discarded = 0;
        for line in self.log_receiver.try_iter() {
            if line.generation == self.generation {
                self.buffer.append(line.text);
                appended += 1;
            } else {
                discarded += 1;
            }
        }
        if discarded > 0 {
            debug!(msg = "Discarded log lines of superseded run", discarded);
        }
        appended
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Newline-joined output.
    pub fn output(&self) -> String {
        self.buffer.text()
    }

    pub fn lines(&self) -> &[String] {
        self.buffer.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn placeholder(&self) -> &'static str {
        OUTPUT_PLACEHOLDER
    }

    /// What a presentation should display: the output or the placeholder if there is none.
    pub fn display_text(&self) -> String {
        if self.buffer.is_empty() {
            OUTPUT_PLACEHOLDER.to_string()
        } else {
            self.buffer.text()
        }
    }

    /// Invokes the callback with the current output immediately and then on every change.
    pub fn subscribe_output(&self, callback: impl FnMut(String) + 'static) -> CancellationHandle {
        self.buffer.observe(callback)
    }

    pub fn active_handle_count(&self) -> usize {
        self.handles.len()
    }

    fn tear_down(&mut self) {
        self.handles.cancel_all();
        if let Some(scope) = self.run_scope.take() {
            scope.unsubscribe();
        }
    }
}

impl Drop for ExampleRunner {
    fn drop(&mut self) {
        self.tear_down();
    }
}

/// Ties every task scheduled during a run to that run.
struct RunScopedScheduler {
    inner: Rc<dyn Scheduler>,
    scope: Subscription,
}

impl Scheduler for RunScopedScheduler {
    fn schedule(&self, delay: Option<Duration>, task: SchedulerTask) -> Subscription {
        let subscription = self.inner.schedule(delay, task);
        self.scope.add(subscription.clone());
        subscription
    }
}
