use tracing_subscriber::{fmt, EnvFilter};

/// Initialize structured logging.
///
/// Honours `RUST_LOG` when set and falls back to `info`. Safe to call
/// more than once (later calls are ignored), so test binaries that
/// initialize logging in several places do not panic.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
