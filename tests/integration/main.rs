//! Cross-layer integration tests for Causeway
//!
//! Tests that drive the recorder the way instrumentation hooks would and then
//! query the result through the insights surface.

mod lifecycle;
mod scenarios;

/// Routes recorder diagnostics to the test harness. Set `RUST_LOG` to see them.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
