use clap::{Parser, Subcommand};
use gallery_high::{
    create_panic_hook, init_tracing, new_main_task_queue, Example, ExampleRegistry,
    ExampleRunner, RunLoopScheduler, Timing, DEFAULT_MAIN_THREAD_TASK_BULK_SIZE,
    DEFAULT_MAIN_THREAD_TASK_CHANNEL_CAPACITY, OUTPUT_PLACEHOLDER,
};
use std::cell::Cell;
use std::error::Error;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

const LOOP_INTERVAL: Duration = Duration::from_millis(10);
const SETTLE_MARGIN: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(
    name = "rx-gallery",
    version,
    about = "Catalog of reactive-programming examples",
    arg_required_else_help = true
)]
struct Cli {
    /// Log filter directive (e.g. `debug` or `gallery_high=trace`).
    #[arg(long, global = true, default_value = "warn", value_name = "FILTER")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lists all examples.
    #[command(alias = "ls")]
    List,

    /// Shows the detail header of an example without running it.
    Show {
        /// Position (1-based) or title.
        selection: String,
    },

    /// Runs an example and prints its output.
    Run {
        /// Position (1-based) or title.
        selection: String,

        /// Quiet period of the debounce example.
        #[arg(long, default_value_t = 300, value_name = "MS")]
        debounce_ms: u64,

        /// Distance between simulated inputs.
        #[arg(long, default_value_t = 100, value_name = "MS")]
        spacing_ms: u64,
    },
}

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    std::panic::set_hook(create_panic_hook());
    let registry = ExampleRegistry::get();
    match cli.command {
        Command::List => {
            for (i, example) in registry.all().iter().enumerate() {
                println!("{:>2}. {:<20} {}", i + 1, example.title(), example.subtitle());
            }
        }
        Command::Show { selection } => {
            // Unknown selection renders nothing
            if let Some(example) = resolve(registry, &selection) {
                print_header(example);
                println!("{OUTPUT_PLACEHOLDER}");
            }
        }
        Command::Run {
            selection,
            debounce_ms,
            spacing_ms,
        } => {
            if let Some(example) = resolve(registry, &selection) {
                let timing = Timing::default()
                    .with_debounce_interval(Duration::from_millis(debounce_ms))
                    .with_input_spacing(Duration::from_millis(spacing_ms));
                run(example, timing);
            }
        }
    }
    Ok(())
}

fn resolve<'a>(registry: &'a ExampleRegistry, selection: &str) -> Option<&'a Example> {
    match selection.trim().parse::<usize>() {
        Ok(position) => registry.by_position(position),
        Err(_) => registry.find_by_title(selection.trim()),
    }
}

fn print_header(example: &Example) {
    println!("{}", example.title());
    println!("{}", example.subtitle());
    println!();
}

/// Pumps a real-time run loop until all scheduled work is done (or the deadline passed).
fn run(example: &Example, timing: Timing) {
    let (task_support, mut middleware) = new_main_task_queue(
        DEFAULT_MAIN_THREAD_TASK_CHANNEL_CAPACITY,
        DEFAULT_MAIN_THREAD_TASK_BULK_SIZE,
    );
    let scheduler = RunLoopScheduler::new(task_support);
    let mut runner = ExampleRunner::builder(Rc::new(scheduler))
        .timing(timing)
        .build();
    print_header(example);
    let printed_count = Rc::new(Cell::new(0usize));
    let _output_subscription = {
        let printed_count = printed_count.clone();
        runner.subscribe_output(move |text| {
            if text.is_empty() {
                printed_count.set(0);
                return;
            }
            let lines: Vec<_> = text.split('\n').collect();
            for line in lines.iter().skip(printed_count.get()) {
                println!("{line}");
            }
            printed_count.set(lines.len());
        })
    };
    runner.run(example);
    let deadline =
        Instant::now() + timing.total_duration() + timing.debounce_interval + SETTLE_MARGIN;
    loop {
        middleware.run();
        runner.pump();
        if middleware.pending_count() == 0 {
            debug!(msg = "Run loop idle");
            break;
        }
        if Instant::now() >= deadline {
            debug!(
                msg = "Deadline passed, abandoning pending tasks",
                pending_count = middleware.pending_count()
            );
            break;
        }
        thread::sleep(LOOP_INTERVAL);
    }
    if runner.is_empty() {
        println!("{}", runner.placeholder());
    }
    runner.reset();
    middleware.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn resolves_by_position_and_title() {
        let registry = ExampleRegistry::get();
        assert_eq!(resolve(registry, "2").map(|e| e.title()), Some("map"));
        assert_eq!(resolve(registry, " Merge ").map(|e| e.title()), Some("merge"));
        assert!(resolve(registry, "0").is_none());
        assert!(resolve(registry, "zip").is_none());
    }

    #[test]
    fn run_flags_default_to_standard_timing() {
        let cli = Cli::parse_from(["rx-gallery", "run", "debounce"]);
        match cli.command {
            Command::Run {
                debounce_ms,
                spacing_ms,
                ..
            } => {
                assert_eq!(debounce_ms, 300);
                assert_eq!(spacing_ms, 100);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.log_level, "warn");
    }
}
