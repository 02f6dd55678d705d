use std::env::var;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber for a workspace binary.
///
/// Log verbosity is taken from `RUST_LOG` (default `info`). Setting
/// `RUST_LOG_FORMAT=json` switches from the compact human-readable format to
/// line-delimited JSON.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();

    let layer = if wants_json() {
        tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed()
    } else {
        tracing_subscriber::fmt::layer().compact().with_filter(env_filter).boxed()
    };

    tracing_subscriber::registry().with(layer).init();
}

fn wants_json() -> bool {
    var("RUST_LOG_FORMAT").map(|format| format == "json").unwrap_or(false)
}
