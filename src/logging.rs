use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{config::Config, error::ConfigError};

const DEFAULT_FILTER: &str = "splashy_bear=info";

/// Installs the global subscriber: stderr output filtered by `RUST_LOG`, plus a
/// daily rolling file when `log_dir` is configured. Keep the returned guard
/// alive for as long as file logs should be flushed.
///
/// Returns `None` when no file is configured or when another global subscriber
/// was installed first, since nothing would write to the file in that case.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(log_dir) = &config.log_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()
            .ok();
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir).map_err(|source| ConfigError::LogDir {
        path: log_dir.clone(),
        source,
    })?;
    let appender = tracing_appender::rolling::daily(log_dir, "splashy-bear.log");
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init();

    match installed {
        Ok(()) => Ok(Some(guard)),
        Err(e) => {
            tracing::warn!("File logging disabled, a subscriber is already installed: {e}");
            Ok(None)
        }
    }
}
