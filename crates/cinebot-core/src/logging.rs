//! Tracing subscriber setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither the config nor `RUST_LOG` sets one
const DEFAULT_FILTER: &str = "cinebot_core=info";

/// Install a formatted `tracing` subscriber.
///
/// `filter` wins over `RUST_LOG`. Calling this more than once is harmless;
/// only the first subscriber is installed.
pub fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}
