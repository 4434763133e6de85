pub mod builders;

use std::fmt;
use std::sync::Once;

use pyority::{PyorityPolicy, Scheduler, Weight};
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run a scheduler to completion and return its points as display lines
/// (`"Start: A"`, `"End  : A"`, ...).
pub fn schedule_lines<T, W, P>(scheduler: &mut Scheduler<T, W, P>) -> anyhow::Result<Vec<String>>
where
    T: fmt::Display,
    W: Weight,
    P: PyorityPolicy<T, W>,
{
    let mut lines = Vec::new();
    for visit in scheduler.traverse() {
        lines.push(visit?.to_string());
    }
    Ok(lines)
}

/// Position of `line` in a schedule, panicking with the full schedule if absent.
pub fn position_of(lines: &[String], line: &str) -> usize {
    lines
        .iter()
        .position(|l| l == line)
        .unwrap_or_else(|| panic!("`{line}` missing from schedule {lines:?}"))
}
