//! Logging setup

use std::fs::OpenOptions;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::FmtSubscriber;

/// Install the global subscriber, appending to `log_file` when given.
///
/// Output goes through a background writer thread; keep the returned guard
/// alive until exit so buffered lines are flushed.
pub fn init_logging(level: Level, log_file: Option<&Path>) -> anyhow::Result<WorkerGuard> {
    let (writer, guard, ansi) = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("init log file {} error: {}", path.display(), e))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            (writer, guard, false)
        }
        None => {
            let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
            (writer, guard, true)
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("failed to set tracing subscriber: {}", e))?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_receives_lines_at_level() {
        let file_name = format!("kafka-adapter-log-{}.log", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        std::fs::remove_file(&path).ok();

        let guard = init_logging(Level::INFO, Some(&path)).unwrap();
        tracing::info!("queued alertmanager envelope");
        tracing::debug!("suppressed below info");
        drop(guard);

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(contents.contains("queued alertmanager envelope"));
        assert!(!contents.contains("suppressed below info"));
        assert!(!contents.contains("\u{1b}["));

        // Only one global subscriber per process
        assert!(init_logging(Level::INFO, None).is_err());
    }
}
