use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays clean. Safe to call more than once.
pub fn init_logging(filter: &str) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|e| {
            eprintln!("[jobtrack] invalid log filter '{}': {}", filter, e);
            EnvFilter::new("warn")
        });

        let subscriber = tracing_subscriber::registry().with(env_filter).with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(false),
        );

        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("[jobtrack] failed to set tracing subscriber: {}", e);
        }
    });
}
