use crossbeam_channel::Sender;
use derivative::Derivative;
use derive_more::Display;
use gallery_rx::{CancellationHandle, Scheduler};
use std::rc::Rc;
use std::time::Duration;

/// Identity of an example within the registry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug, Display)]
#[display(fmt = "#{}", _0)]
pub struct ExampleId(u32);

impl ExampleId {
    pub const fn new(raw: u32) -> ExampleId {
        ExampleId(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Something which starts a reactive pipeline and reports what happens via the context's log.
///
/// Returning `None` means the pipeline already finished (or cancelled itself) and there's nothing
/// left to cancel.
pub trait Recipe {
    fn execute(&self, context: &RecipeContext) -> Option<CancellationHandle>;
}

impl<F> Recipe for F
where
    F: Fn(&RecipeContext) -> Option<CancellationHandle>,
{
    fn execute(&self, context: &RecipeContext) -> Option<CancellationHandle> {
        self(context)
    }
}

/// A labeled demonstration.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Example {
    id: ExampleId,
    title: &'static str,
    subtitle: &'static str,
    #[derivative(Debug = "ignore")]
    recipe: Box<dyn Recipe + Send + Sync>,
}

impl Example {
    pub fn new(
        id: ExampleId,
        title: &'static str,
        subtitle: &'static str,
        recipe: impl Recipe + Send + Sync + 'static,
    ) -> Example {
        Example {
            id,
            title,
            subtitle,
            recipe: Box::new(recipe),
        }
    }

    pub fn id(&self) -> ExampleId {
        self.id
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn subtitle(&self) -> &'static str {
        self.subtitle
    }

    pub fn execute(&self, context: &RecipeContext) -> Option<CancellationHandle> {
        self.recipe.execute(context)
    }
}

/// Everything a recipe gets to work with.
pub struct RecipeContext {
    log_sink: LogSink,
    scheduler: Rc<dyn Scheduler>,
    timing: Timing,
}

impl RecipeContext {
    pub fn new(log_sink: LogSink, scheduler: Rc<dyn Scheduler>, timing: Timing) -> RecipeContext {
        RecipeContext {
            log_sink,
            scheduler,
            timing,
        }
    }

    pub fn log(&self, line: impl Into<String>) {
        self.log_sink.log(line);
    }

    /// Returns a sink which can be moved into closures (and to other threads).
    pub fn log_sink(&self) -> LogSink {
        self.log_sink.clone()
    }

    /// Delayed work must go through this scheduler in order to be cancelled together with the run.
    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.scheduler
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }
}

impl std::fmt::Debug for RecipeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeContext")
            .field("log_sink", &self.log_sink)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub(crate) struct LogLine {
    pub generation: u64,
    pub text: String,
}

/// Sends log lines to the runner which created it.
///
/// Lines are tagged with the run generation, so the runner can drop lines of superseded runs.
#[derive(Clone, Debug)]
pub struct LogSink {
    generation: u64,
    sender: Sender<LogLine>,
}

impl LogSink {
    pub(crate) fn new(generation: u64, sender: Sender<LogLine>) -> LogSink {
        LogSink { generation, sender }
    }

    pub fn log(&self, line: impl Into<String>) {
        let line = LogLine {
            generation: self.generation,
            text: line.into(),
        };
        // Runner gone means nobody is interested anymore.
        let _ = self.sender.send(line);
    }
}

/// Time settings of the time-based examples.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Timing {
    /// Quiet period after which the debounce example emits.
    pub debounce_interval: Duration,
    /// Distance between two simulated inputs.
    pub input_spacing: Duration,
    /// How long to wait after the last input before logging the closing note.
    pub settle_delay: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            debounce_interval: Duration::from_millis(300),
            input_spacing: Duration::from_millis(100),
            settle_delay: Duration::from_millis(400),
        }
    }
}

impl Timing {
    pub fn with_debounce_interval(mut self, value: Duration) -> Timing {
        self.debounce_interval = value;
        self
    }

    pub fn with_input_spacing(mut self, value: Duration) -> Timing {
        self.input_spacing = value;
        self
    }

    pub fn with_settle_delay(mut self, value: Duration) -> Timing {
        self.settle_delay = value;
        self
    }

    /// Time from the first simulated input until the closing note of the debounce example.
    pub fn total_duration(&self) -> Duration {
        self.input_spacing * 2 + self.settle_delay
    }
}
