//! Diagnostic tracing on stderr.
//!
//! User-facing output goes through the `Terminal` port; this is only for
//! debugging and is silent at the default `warn` level.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the subscriber. `RUST_LOG` wins; otherwise `warn`, or
/// `gitship=debug` with `--verbose`.
pub fn init(verbose: bool) {
    let default = if verbose { "warn,gitship=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
