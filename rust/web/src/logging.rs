//! Tracing setup for the server binary.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber: env-filtered, with targets and source
/// locations. Defaults to `info` overall and `debug` for this crate.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,skirmish_web=debug"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default subscriber");
}
