use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global JSON log subscriber, filtered by `RUST_LOG`.
///
/// Idempotent: a second call (tests, embedded use) is a no-op instead
/// of a panic.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().json())
        .try_init();
}
