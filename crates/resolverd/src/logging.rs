use clap::ValueEnum;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

/// Initialize the global tracing subscriber. When `diag_log_dir` is
/// given, diagnostics go to a daily-rolling file in that directory
/// instead of stderr. The returned guard must be kept alive for the
/// life of the process -- dropping it stops the background writer
/// thread and any buffered lines are lost.
pub fn init(diag_log_dir: Option<PathBuf>, format: LogFormat) -> tracing_appender::non_blocking::WorkerGuard {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, guard) = match &diag_log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "resolverd.log");
            tracing_appender::non_blocking(appender)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(writer).pretty())
                .init();
        }
        LogFormat::Compact => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(writer).compact())
                .init();
        }
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(writer).json())
                .init();
        }
    }

    guard
}
