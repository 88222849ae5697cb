//! Process-wide tracing initialization.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global tracing subscriber once
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies. Repeated
/// calls are no-ops, so tests and embedding binaries can both call this
/// unconditionally.
pub fn init(default_filter: &str) {
    let default_filter = default_filter.to_string();
    INIT.call_once(move || {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    });
}
