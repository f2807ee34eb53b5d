//! Structured logging setup: an `EnvFilter` layered over either a
//! human-readable or JSON `tracing_subscriber` formatter, selected by CLI
//! flag.

use crate::cli::TracingFormat;
use crate::config::Config;
use tracing_subscriber::EnvFilter;

/// Configure and install the global tracing subscriber.
///
/// `RUST_LOG` always wins if set; otherwise the filter defaults to
/// `warn` crate-wide and `config.log_level` for this crate specifically, so
/// a noisy dependency doesn't drown out our own logs.
pub fn setup_logging(config: &Config, tracing_format: TracingFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let base_level = &config.log_level;
        EnvFilter::new(format!("warn,schedgen={base_level}"))
    });

    let subscriber = tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(filter);

    match tracing_format {
        TracingFormat::Pretty => subscriber.pretty().init(),
        TracingFormat::Json => subscriber.json().init(),
    }
}
