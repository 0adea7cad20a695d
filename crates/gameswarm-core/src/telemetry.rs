//! Centralised tracing initialisation for gameswarm binaries.
//!
//! Call [`init_tracing`] once at program start to configure the global
//! subscriber with an `EnvFilter` and optional JSON formatting.
//!
//! Safe to call more than once; subsequent calls are silently ignored
//! (the global subscriber can only be set once per process).

use tracing::Level;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Initialise the global tracing subscriber.
///
/// * `json` — when `true`, emit newline-delimited JSON log lines (the
///   CLI's `--json` flag) for log collectors; plain human-readable
///   lines otherwise.
/// * `level` — default verbosity when `RUST_LOG` is not set.
///
/// Respects the `RUST_LOG` environment variable for fine-grained
/// filtering; falls back to the supplied `level` otherwise.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    // Targets are module paths of this workspace; the event fields
    // already say where a line came from, so targets stay off.
    let fmt_layer = fmt::layer().with_target(false);
    let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    Registry::default()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .ok();
}
