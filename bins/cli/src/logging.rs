//! Tracing subscriber setup.

use fieldcheck_config::LogFormat;
use std::io;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `FIELDCHECK_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the global subscriber. Logs always go to stderr so stdout stays
/// reserved for command output.
pub fn init_tracing(filter: Option<&str>, format: LogFormat) {
    let filter = filter
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init(),
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
