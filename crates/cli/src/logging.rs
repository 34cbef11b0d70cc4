//! Logging setup for the `newsrel` binary

use newsrel_core::LoggingConfig;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "newsrel.log";

/// Parse log level from config string
fn parse_log_level(level: &str) -> tracing::Level {
  match level.to_lowercase().as_str() {
    "off" | "error" => tracing::Level::ERROR,
    "warn" => tracing::Level::WARN,
    "info" => tracing::Level::INFO,
    "debug" => tracing::Level::DEBUG,
    "trace" => tracing::Level::TRACE,
    _ => tracing::Level::INFO,
  }
}

fn env_filter(level: tracing::Level) -> EnvFilter {
  // RUST_LOG wins over the configured level
  EnvFilter::builder().with_default_directive(level.into()).from_env_lossy()
}

/// Console logging on stderr; stdout is reserved for command output
fn init_console(level: tracing::Level) {
  tracing_subscriber::fmt()
    .with_env_filter(env_filter(level))
    .with_writer(std::io::stderr)
    .with_target(true)
    .init();
}

/// Initialize logging from config.
///
/// Logs go to stderr unless `logging.directory` is set, in which case they go to a rolling
/// file there. `verbose` raises the level to debug.
///
/// Returns the guard that must be kept alive for file logging to flush
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Option<WorkerGuard> {
  let level = if verbose {
    tracing::Level::DEBUG
  } else {
    parse_log_level(&config.level)
  };

  let Some(directory) = config.directory.as_deref() else {
    init_console(level);
    return None;
  };

  let log_dir = Path::new(directory);
  if std::fs::create_dir_all(log_dir).is_err() {
    init_console(level);
    tracing::warn!(directory, "Could not create log directory, logging to stderr");
    return None;
  }

  let file_appender = match config.rotation.as_str() {
    "hourly" => tracing_appender::rolling::hourly(log_dir, LOG_FILE_NAME),
    "never" => tracing_appender::rolling::never(log_dir, LOG_FILE_NAME),
    _ => tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME),
  };
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

  tracing_subscriber::fmt()
    .with_env_filter(env_filter(level))
    .with_target(true)
    .with_ansi(false)
    .with_writer(file_writer)
    .init();

  Some(guard)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_log_level() {
    assert_eq!(parse_log_level("DEBUG"), tracing::Level::DEBUG);
    assert_eq!(parse_log_level("off"), tracing::Level::ERROR);
    assert_eq!(parse_log_level("warn"), tracing::Level::WARN);
    assert_eq!(parse_log_level("verbose"), tracing::Level::INFO);
  }
}
