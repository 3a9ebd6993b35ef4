//! Logging setup with optional file output for production runs.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::infrastructure::config;

/// Initialize logging with console output, plus a daily-rolling log file under
/// the platform log directory when `with_file` is set.
pub fn setup(with_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer().with_target(true).with_filter(filter);

    let file_layer = if with_file {
        let log_dir = config::log_dir();
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!("Warning: Failed to create log directory {:?}: {}", log_dir, e);
            None
        } else {
            let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "ipkey.log");
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(file_appender)
                    .with_filter(EnvFilter::new("info")),
            )
        }
    } else {
        None
    };

    match file_layer {
        Some(file_layer) => {
            tracing_subscriber::registry()
                .with(console_layer)
                .with(file_layer)
                .init();
        }
        None => {
            tracing_subscriber::registry().with(console_layer).init();
        }
    }

    if with_file {
        tracing::info!("File logging enabled: {:?}", config::log_dir());
    }
    tracing::info!("Logging initialized");
}
