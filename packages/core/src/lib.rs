// Library root. The binary in `src/main.rs` and the integration tests in
// `tests/` both assemble the engine from these modules.

pub mod alerts;
pub mod geofence;
pub mod metrics;
pub mod scheduler;
pub mod services;

// Binary-only wiring: env config, CLI args, logging setup, app errors.
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
