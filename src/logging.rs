use crate::config::{Config, Environment, LogFormat};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins; otherwise the level comes
/// from the config, or from the local profile when there is no config yet.
pub fn init(config: Option<&Config>) {
    let (level, format) = match config {
        Some(c) => (c.log_level().to_string(), c.log_format()),
        None => (
            Environment::Local.default_log_level().to_string(),
            Environment::Local.default_log_format(),
        ),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("folio={},warn", level.trim()).into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Verbose => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
