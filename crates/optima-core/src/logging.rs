//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable controlling the log filter (falls back to `info`).
pub const LOG_ENV_VAR: &str = "OPTIMA_LOG";

/// Initialize the global tracing subscriber.
///
/// Filter comes from `OPTIMA_LOG` (e.g. `optima_server=debug,info`).
/// With `json = true`, logs are emitted as structured JSON lines for
/// ingestion; otherwise human-readable fmt output.
///
/// Safe to call once per process; a second call is a no-op (the global
/// default can only be set once).
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already initialized");
    }
}
