//! Tracing setup for the application.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber.
///
/// Log verbosity is controlled with the `RUST_LOG` environment variable;
/// the default keeps the voting crates at `info`.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
