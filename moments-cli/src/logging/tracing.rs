use std::{io, sync::Arc};

use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// `LOG_LEVEL` wins over the configured level.
/// Logs go to stderr, stdout is kept for command output.
pub fn set_up_logging(log_level: &str) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .pretty()
        .with_thread_names(true)
        .with_writer(Arc::new(io::stderr()));

    let env_filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();
}
