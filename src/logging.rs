use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "sitegen=info";
/// Filter used with `--verbose`.
pub const VERBOSE_FILTER: &str = "sitegen=debug";

/// Installs the global tracing subscriber, honoring `RUST_LOG` and falling back
/// to `default_filter`. Log lines go to stderr so stdout stays a clean summary.
pub fn setup_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init()
}
