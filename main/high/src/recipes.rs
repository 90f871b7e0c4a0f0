//! The pipelines behind the registry entries.
use crate::RecipeContext;
use gallery_rx::{
    from_iter, just, CancellationHandle, Observable, PassthroughSubject, Scheduler,
};

pub fn just_and_sink(ctx: &RecipeContext) -> Option<CancellationHandle> {
    ctx.log(r#"subscribing to just("Hello")"#);
    let log = ctx.log_sink();
    let handle = just("Hello").sink(move |value| log.log(format!("received value: {value}")));
    Some(handle)
}

pub fn map(ctx: &RecipeContext) -> Option<CancellationHandle> {
    ctx.log("subscribing to [1, 2, 3].map(x * 10)");
    let (log, completion_log) = (ctx.log_sink(), ctx.log_sink());
    let handle = from_iter([1, 2, 3]).map(|x| x * 10).sink_with_completion(
        move |value| log.log(format!("value: {value}")),
        move |completion| completion_log.log(format!("completion: {completion}")),
    );
    Some(handle)
}

pub fn filter(ctx: &RecipeContext) -> Option<CancellationHandle> {
    ctx.log("subscribing to [1, 2, 3, 4, 5].filter(is even)");
    let (log, completion_log) = (ctx.log_sink(), ctx.log_sink());
    let handle = from_iter([1, 2, 3, 4, 5])
        .filter(|x| x % 2 == 0)
        .sink_with_completion(
            move |value| log.log(format!("value: {value}")),
            move |completion| completion_log.log(format!("completion: {completion}")),
        );
    Some(handle)
}

/// Cancels its own subscription, so there's nothing to hand out.
pub fn passthrough_subject(ctx: &RecipeContext) -> Option<CancellationHandle> {
    let subject = PassthroughSubject::new();
    ctx.log("creating subject and subscribing");
    let log = ctx.log_sink();
    let handle = subject
        .clone()
        .sink(move |value| log.log(format!("sink received: {value}")));
    ctx.log("subject.send(A)");
    subject.send("A");
    ctx.log("subject.send(B)");
    subject.send("B");
    ctx.log("after cancelling, send(C) is not received");
    handle.cancel();
    subject.send("C");
    None
}

pub fn merge(ctx: &RecipeContext) -> Option<CancellationHandle> {
    let a = from_iter([1, 3, 5]);
    let b = from_iter([2, 4, 6]);
    ctx.log("subscribing to a.merge(b)");
    let (log, completion_log) = (ctx.log_sink(), ctx.log_sink());
    let handle = a.merge(b).sink_with_completion(
        move |value| log.log(format!("value: {value}")),
        move |completion| completion_log.log(format!("completion: {completion}")),
    );
    Some(handle)
}

pub fn combine_latest(ctx: &RecipeContext) -> Option<CancellationHandle> {
    let s1 = PassthroughSubject::<i32>::new();
    let s2 = PassthroughSubject::<&'static str>::new();
    ctx.log("subscribing to s1.combine_latest(s2)");
    let log = ctx.log_sink();
    let handle = s1
        .clone()
        .combine_latest(s2.clone())
        .sink(move |(a, b)| log.log(format!("value: ({a}, {b})")));
    ctx.log("s1.send(1)");
    s1.send(1);
    ctx.log("s2.send(A)");
    s2.send("A");
    ctx.log("s2.send(B)");
    s2.send("B");
    ctx.log("s1.send(2)");
    s1.send(2);
    Some(handle)
}

/// Simulates fast typing. Inputs and the closing note are scheduled on the context's scheduler and
/// tied to the returned handle.
pub fn debounce(ctx: &RecipeContext) -> Option<CancellationHandle> {
    let timing = ctx.timing();
    let subject = PassthroughSubject::<String>::new();
    ctx.log(format!(
        "subscribing to subject.debounce({} ms)",
        timing.debounce_interval.as_millis()
    ));
    let log = ctx.log_sink();
    let handle = subject
        .clone()
        .debounce(timing.debounce_interval, ctx.scheduler().clone())
        .sink(move |value| log.log(format!("debounced value: {value}")));
    ctx.log("simulating fast input: A -> AB -> ABC");
    let inputs = ["A", "AB", "ABC"];
    for (i, input) in inputs.into_iter().enumerate() {
        let subject = subject.clone();
        let timer = ctx.scheduler().schedule(
            Some(timing.input_spacing * i as u32),
            Box::new(move || subject.send(input.to_string())),
        );
        handle.subscription().add(timer);
    }
    let log = ctx.log_sink();
    let total = timing.total_duration();
    let note = ctx.scheduler().schedule(
        Some(total),
        Box::new(move || {
            log.log(format!(
                "(after {:.1} s you should only see ABC)",
                total.as_secs_f64()
            ))
        }),
    );
    handle.subscription().add(note);
    Some(handle)
}
