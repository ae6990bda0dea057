mod dialog_tests;
mod fields_tests;
mod readiness_tests;

use std::sync::Arc;
use std::time::Duration;

use crate::wait::WaitConfig;
use crate::Maximo;
use self::mock::MockDriver;

// Initialize tracing for tests. Safe to call from every test; only the
// first call installs the subscriber.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .try_init();
}

/// Wait tuning that keeps polling loops fast and lets timeout tests finish
/// in well under a second.
pub fn test_config() -> WaitConfig {
    WaitConfig {
        timeout: Duration::from_millis(250),
        poll_interval: Duration::from_millis(2),
        settle_delay: Duration::ZERO,
        retry_backoff: Duration::from_millis(2),
        max_retries: 5,
    }
}

/// An engine over the given scripted driver, with test wait tuning.
pub fn maximo_with(mock: &Arc<MockDriver>) -> Maximo {
    Maximo::with_config(mock.clone(), test_config())
}
