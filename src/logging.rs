use std::fs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Console logging on stderr plus a JSON log file under `logs/`, rotated daily.
pub fn init_logging() {
    let _ = fs::create_dir_all("logs");

    let (file_writer, flush_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily("logs", "scan_dwc.log"));
    let file_layer = fmt::layer().json().with_writer(file_writer);

    // stdout is reserved for `terms` output and the run summary
    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scan_dwc=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    // The writer thread flushes until the process exits
    std::mem::forget(flush_guard);
}
