//! Diagnostic logging.
//!
//! Configure via the `GRIDFILL_LOG` environment variable (`EnvFilter` syntax):
//! - `GRIDFILL_LOG=debug` - all debug logs
//! - `GRIDFILL_LOG=gridfill_core=debug,gridfill_engine=trace` - per crate
//!
//! Logs go to stderr so stdout carries only command output.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "GRIDFILL_LOG";

pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(console).try_init();
}
