use std::env;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_LOG_FILE: &str = "./logs/zip-reconcile.log";

/// Console on stderr plus a plain-text log file. The returned guard flushes
/// the file writer when dropped.
pub fn init_logger() -> impl Drop {
    let level = env::var("TRACING_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_file = env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never("./", &log_file));

    // Keep stdout free for the compare --json envelope.
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .pretty()
        .with_file(false)
        .without_time()
        .with_ansi(true);
    let file = fmt::layer().with_writer(file_writer).with_ansi(false);

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .with(EnvFilter::new(level))
        .init();

    debug!("Logging reconcile runs to stderr and {}", log_file);

    guard
}
