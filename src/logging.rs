//! Tracing subscriber setup for the command-line client

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Filter used when RUST_LOG is not set
const DEFAULT_FILTER: &str = "nuget_client=info";

/// Where log output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    /// Append to this file, creating parent directories as needed
    File(&'a Path),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// The returned guard flushes buffered log lines when dropped, so keep it
/// alive for the lifetime of the program.
pub fn init(target: LogTarget<'_>) -> anyhow::Result<WorkerGuard> {
    let (writer, guard) = match target {
        LogTarget::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogTarget::File(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)?;
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("log path has no file name: {}", path.display()))?;
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(matches!(target, LogTarget::Stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(guard)
}
