//! Structured logging initialisation.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install the global `tracing` subscriber, mapping `-v` repeat count to a
/// filter level: 0 = warn, 1 = info, 2 = debug, 3+ = trace. Safe to call more
/// than once; only the first call takes effect.
pub fn init(verbosity: u8) {
    INIT.call_once(|| {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}
