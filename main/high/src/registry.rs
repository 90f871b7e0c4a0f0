use crate::{recipes, Example, ExampleId, RecipeContext};
use gallery_rx::CancellationHandle;
use once_cell::sync::Lazy;

static REGISTRY: Lazy<ExampleRegistry> = Lazy::new(|| ExampleRegistry {
    examples: create_examples(),
});

/// The fixed catalog of examples in display order.
#[derive(Debug)]
pub struct ExampleRegistry {
    examples: Vec<Example>,
}

impl ExampleRegistry {
    /// Gives access to the process-wide registry, creating it on first access.
    pub fn get() -> &'static ExampleRegistry {
        &REGISTRY
    }

    pub fn all(&self) -> &[Example] {
        &self.examples
    }

    pub fn find(&self, id: ExampleId) -> Option<&Example> {
        self.examples.iter().find(|e| e.id() == id)
    }

    /// Case-insensitive.
    pub fn find_by_title(&self, title: &str) -> Option<&Example> {
        self.examples
            .iter()
            .find(|e| e.title().eq_ignore_ascii_case(title))
    }

    /// Looks up an example by its 1-based display position.
    pub fn by_position(&self, position: usize) -> Option<&Example> {
        position
            .checked_sub(1)
            .and_then(|index| self.examples.get(index))
    }

    /// Returns the 1-based display position.
    pub fn position(&self, id: ExampleId) -> Option<usize> {
        self.examples
            .iter()
            .position(|e| e.id() == id)
            .map(|index| index + 1)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

type RecipeFn = fn(&RecipeContext) -> Option<CancellationHandle>;

fn create_examples() -> Vec<Example> {
    let entries: [(&'static str, &'static str, RecipeFn); 7] = [
        (
            "Just + sink",
            "The most basic publisher subscription",
            recipes::just_and_sink,
        ),
        ("map", "Maps each Int to a new value", recipes::map),
        ("filter", "Only keeps even numbers", recipes::filter),
        (
            "PassthroughSubject",
            "Manual send + cancel",
            recipes::passthrough_subject,
        ),
        (
            "merge",
            "Merges two publishers into one stream",
            recipes::merge,
        ),
        (
            "combineLatest",
            "Emits the latest combination whenever either subject updates",
            recipes::combine_latest,
        ),
        (
            "debounce",
            "Only keeps the last of several quick inputs (needs a run loop)",
            recipes::debounce,
        ),
    ];
    entries
        .into_iter()
        .zip(1..)
        .map(|((title, subtitle, recipe), raw_id)| {
            Example::new(ExampleId::new(raw_id), title, subtitle, recipe)
        })
        .collect()
}
