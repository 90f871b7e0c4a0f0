use std::backtrace::Backtrace;
use std::error::Error;
use std::panic::PanicHookInfo;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber which writes to stderr.
///
/// `directive` uses the `EnvFilter` syntax, e.g. `warn` or `gallery_high=debug,info`. Fails if a
/// global subscriber has been installed already.
pub fn init_tracing(directive: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(std::io::stderr)
        .try_init()
}

/// Creates a panic hook which logs the panic including a backtrace.
pub fn create_panic_hook() -> Box<dyn Fn(&PanicHookInfo<'_>) + 'static + Sync + Send> {
    Box::new(|panic_info| {
        let backtrace = Backtrace::force_capture();
        log_panic(panic_info, &backtrace);
    })
}

pub fn extract_panic_message(panic_info: &PanicHookInfo) -> String {
    let payload = panic_info.payload();
    match payload.downcast_ref::<&str>() {
        Some(p) => (*p).to_string(),
        None => match payload.downcast_ref::<String>() {
            Some(p) => p.clone(),
            None => String::from("Unknown error"),
        },
    }
}

pub fn log_panic(panic_info: &PanicHookInfo, backtrace: &Backtrace) {
    let message = extract_panic_message(panic_info);
    let location = panic_info
        .location()
        .map(|l| l.to_string())
        .unwrap_or_default();
    error!(
        msg = "Panic",
        message = %message,
        location = %location,
        backtrace = %backtrace
    );
}
