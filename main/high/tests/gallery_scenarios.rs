use gallery_high::{
    Example, ExampleId, ExampleRegistry, ExampleRunner, RecipeContext, RunnerState, Timing,
};
use gallery_rx::{CancellationHandle, Subscription, VirtualTimeScheduler};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn create_runner() -> (VirtualTimeScheduler, ExampleRunner) {
    let scheduler = VirtualTimeScheduler::new();
    let runner = ExampleRunner::new(Rc::new(scheduler.clone()));
    (scheduler, runner)
}

fn example(title: &str) -> &'static Example {
    ExampleRegistry::get()
        .find_by_title(title)
        .unwrap_or_else(|| panic!("example {title} missing"))
}

fn lines(runner: &ExampleRunner) -> Vec<&str> {
    runner.lines().iter().map(String::as_str).collect()
}

/// Example whose handle can be observed from the outside.
fn observable_handle_example(
    captured: Arc<Mutex<Vec<bool>>>,
) -> (Example, Rc<RefCell<Vec<Subscription>>>) {
    // Subscriptions are `Rc`-based, so they are handed out via a thread-local.
    thread_local! {
        static SUBSCRIPTIONS: Rc<RefCell<Vec<Subscription>>> = Default::default();
    }
    let subscriptions = SUBSCRIPTIONS.with(|s| s.clone());
    let example = Example::new(
        ExampleId::new(100),
        "observable",
        "",
        move |ctx: &RecipeContext| {
            ctx.log("hello");
            captured.lock().unwrap().push(true);
            let subscription = Subscription::new();
            SUBSCRIPTIONS.with(|s| s.borrow_mut().push(subscription.clone()));
            Some(CancellationHandle::new(subscription))
        },
    );
    (example, subscriptions)
}

#[test]
fn every_example_is_cleared_by_reset() {
    for e in ExampleRegistry::get().all() {
        let (scheduler, mut runner) = create_runner();
        runner.run(e);
        assert!(!runner.is_empty(), "{} produced nothing", e.title());
        runner.reset();
        scheduler.run_until_idle();
        runner.pump();
        assert!(runner.is_empty(), "{} left output behind", e.title());
        assert_eq!(runner.state(), RunnerState::Idle);
        assert_eq!(runner.active_handle_count(), 0);
        assert_eq!(scheduler.pending_count(), 0);
    }
}

fn settled_output(example: &Example) -> Vec<String> {
    let (scheduler, mut runner) = create_runner();
    runner.run(example);
    scheduler.run_until_idle();
    runner.pump();
    runner.lines().to_vec()
}

#[test]
fn every_example_run_twice_only_shows_second_run() {
    for e in ExampleRegistry::get().all() {
        let (scheduler, mut runner) = create_runner();
        runner.run(e);
        // Far enough into the debounce example for a pending debounced value
        scheduler.advance_by(Duration::from_millis(250));
        runner.run(e);
        scheduler.run_until_idle();
        runner.pump();
        assert_eq!(runner.lines(), settled_output(e), "{}", e.title());
    }
}

#[test]
fn restarted_debounce_shows_no_intermediate_values() {
    let (scheduler, mut runner) = create_runner();
    let e = example("debounce");
    runner.run(e);
    scheduler.advance_by(Duration::from_millis(250));
    runner.run(e);
    scheduler.run_until_idle();
    runner.pump();
    let debounced: Vec<_> = runner
        .lines()
        .iter()
        .filter(|l| l.starts_with("debounced value"))
        .collect();
    assert_eq!(debounced, vec!["debounced value: ABC"]);
}

#[test]
fn run_then_reset_cancels_handle() {
    let (_, mut runner) = create_runner();
    let (example, subscriptions) = observable_handle_example(Default::default());
    runner.run(&example);
    assert_eq!(lines(&runner), vec!["Started: observable", "hello"]);
    assert_eq!(runner.active_handle_count(), 1);
    let subscription = subscriptions.borrow().last().cloned().unwrap();
    assert!(!subscription.is_closed());
    runner.reset();
    assert!(subscription.is_closed());
    assert!(runner.is_empty());
}

#[test]
fn second_run_cancels_first_handle() {
    let (_, mut runner) = create_runner();
    let invocations: Arc<Mutex<Vec<bool>>> = Default::default();
    let (example, subscriptions) = observable_handle_example(invocations.clone());
    runner.run(&example);
    runner.run(&example);
    assert_eq!(invocations.lock().unwrap().len(), 2);
    let subscriptions = subscriptions.borrow();
    let n = subscriptions.len();
    assert!(subscriptions[n - 2].is_closed());
    assert!(!subscriptions[n - 1].is_closed());
    assert_eq!(lines(&runner), vec!["Started: observable", "hello"]);
}

#[test]
fn reset_is_idempotent() {
    let (_, mut runner) = create_runner();
    runner.reset();
    runner.run(example("map"));
    runner.reset();
    let text = runner.output();
    runner.reset();
    assert_eq!(runner.output(), text);
    assert_eq!(runner.state(), RunnerState::Idle);
    assert_eq!(runner.display_text(), runner.placeholder());
}

#[test]
fn just_and_sink_receives_hello() {
    let (_, mut runner) = create_runner();
    runner.run(example("Just + sink"));
    assert_eq!(
        lines(&runner),
        vec![
            "Started: Just + sink",
            r#"subscribing to just("Hello")"#,
            "received value: Hello",
        ]
    );
}

#[test]
fn map_multiplies_by_ten() {
    let (_, mut runner) = create_runner();
    runner.run(example("map"));
    assert_eq!(
        lines(&runner)[2..],
        ["value: 10", "value: 20", "value: 30", "completion: finished"]
    );
}

#[test]
fn filter_keeps_evens() {
    let (_, mut runner) = create_runner();
    runner.run(example("filter"));
    assert_eq!(
        lines(&runner)[2..],
        ["value: 2", "value: 4", "completion: finished"]
    );
}

#[test]
fn passthrough_subject_stops_receiving_after_cancel() {
    let (_, mut runner) = create_runner();
    let e = ExampleRegistry::get().by_position(4).unwrap();
    assert_eq!(e.title(), "PassthroughSubject");
    runner.run(e);
    assert_eq!(
        lines(&runner),
        vec![
            "Started: PassthroughSubject",
            "creating subject and subscribing",
            "subject.send(A)",
            "sink received: A",
            "subject.send(B)",
            "sink received: B",
            "after cancelling, send(C) is not received",
        ]
    );
    assert_eq!(runner.active_handle_count(), 0);
}

#[test]
fn merge_completes_once_after_both_sources() {
    let (_, mut runner) = create_runner();
    runner.run(example("merge"));
    let lines = lines(&runner);
    let values: Vec<_> = lines.iter().filter(|l| l.starts_with("value: ")).collect();
    assert_eq!(values.len(), 6);
    let completions: Vec<_> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.starts_with("completion: "))
        .collect();
    assert_eq!(completions.len(), 1);
    assert_eq!(completions[0].0, lines.len() - 1);
    assert_eq!(
        lines[2..8],
        ["value: 1", "value: 3", "value: 5", "value: 2", "value: 4", "value: 6"]
    );
}

#[test]
fn combine_latest_emits_three_combinations() {
    let (_, mut runner) = create_runner();
    runner.run(example("combineLatest"));
    let lines = lines(&runner);
    let values: Vec<_> = lines
        .iter()
        .copied()
        .filter(|l| l.starts_with("value: "))
        .collect();
    assert_eq!(values, vec!["value: (1, A)", "value: (1, B)", "value: (2, B)"]);
    // Nothing combined before both sides emitted
    let first_value = lines.iter().position(|l| l.starts_with("value: ")).unwrap();
    let s2_sent = lines.iter().position(|l| *l == "s2.send(A)").unwrap();
    assert!(first_value > s2_sent);
    assert_eq!(runner.active_handle_count(), 1);
}

#[test]
fn debounce_emits_only_last_input() {
    let (scheduler, mut runner) = create_runner();
    runner.run(example("debounce"));
    assert!(!runner.output().contains("debounced value"));
    scheduler.advance_by(Duration::from_millis(499));
    runner.pump();
    assert!(!runner.output().contains("debounced value"));
    scheduler.advance_by(Duration::from_millis(1));
    runner.pump();
    assert_eq!(lines(&runner).last(), Some(&"debounced value: ABC"));
    scheduler.advance_by(Duration::from_millis(100));
    runner.pump();
    let lines = lines(&runner);
    let debounced: Vec<_> = lines
        .iter()
        .filter(|l| l.starts_with("debounced value"))
        .collect();
    assert_eq!(debounced, vec![&"debounced value: ABC"]);
    assert_eq!(
        lines.last(),
        Some(&"(after 0.6 s you should only see ABC)")
    );
    assert_eq!(scheduler.pending_count(), 0);
}

#[test]
fn debounce_respects_configured_timing() {
    let scheduler = VirtualTimeScheduler::new();
    let timing = Timing::default()
        .with_debounce_interval(Duration::from_millis(50))
        .with_input_spacing(Duration::from_millis(100));
    let mut runner = ExampleRunner::builder(Rc::new(scheduler.clone()))
        .timing(timing)
        .build();
    runner.run(example("debounce"));
    scheduler.run_until_idle();
    runner.pump();
    let debounced: Vec<_> = runner
        .lines()
        .iter()
        .filter(|l| l.starts_with("debounced value"))
        .cloned()
        .collect();
    assert_eq!(
        debounced,
        vec![
            "debounced value: A",
            "debounced value: AB",
            "debounced value: ABC"
        ]
    );
}

#[test]
fn cancelled_debounce_run_stays_silent() {
    let (scheduler, mut runner) = create_runner();
    runner.run(example("debounce"));
    scheduler.advance_by(Duration::from_millis(250));
    runner.reset();
    scheduler.run_until_idle();
    runner.pump();
    assert!(runner.is_empty());
}

#[test]
fn output_observers_see_every_change() {
    let (_, mut runner) = create_runner();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = seen.clone();
    let _handle = runner.subscribe_output(move |text| s.borrow_mut().push(text));
    runner.run(example("Just + sink"));
    runner.reset();
    let seen = seen.borrow();
    assert_eq!(seen.first().map(String::as_str), Some(""));
    assert_eq!(seen.last().map(String::as_str), Some(""));
    assert!(seen.iter().any(|t| t.ends_with("received value: Hello")));
}
