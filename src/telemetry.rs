use tracing::Subscriber;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

// ───── Body ─────────────────────────────────────────────────────────────── //

/// Compose the subscriber: `RUST_LOG` wins, `default_filter` otherwise.
pub fn get_subscriber(default_filter: &str) -> impl Subscriber + Send + Sync {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let fmt_layer = fmt::layer()
        .with_level(true)
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339());

    Registry::default().with(env_filter).with(fmt_layer)
}

/// Register a subscriber as global default. Should only be called once.
pub fn init_subscriber(
    subscriber: impl Subscriber + Send + Sync,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(subscriber)
}
