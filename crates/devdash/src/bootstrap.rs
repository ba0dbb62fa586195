use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use devdash_core::config::Config;
use devdash_core::error::DashError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Create the directory that will hold the log file.
pub fn ensure_directories(log_path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = log_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a CLI level name to an [`EnvFilter`] directive.
pub fn filter_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Install the global subscriber, writing to `log_path`.
///
/// The terminal belongs to the dashboard, so nothing is logged to stdout or
/// stderr. `RUST_LOG` overrides the level when set. Keep the returned guard
/// alive until exit or buffered lines are lost.
pub fn setup_logging(log_level: &str, log_path: &Path) -> anyhow::Result<WorkerGuard> {
    let dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = log_path
        .file_name()
        .context("log file path has no file name")?;
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(false))
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(guard)
}

// ── Configuration ──────────────────────────────────────────────────────────────

/// Outcome of reading the configuration file at startup.
#[derive(Debug)]
pub enum Startup {
    Ready(Config),
    Missing,
    Invalid(DashError),
}

pub fn load_config(path: &Path) -> Startup {
    match Config::load(path) {
        Ok(config) => Startup::Ready(config),
        Err(DashError::ConfigFile { source, .. }) if source.kind() == ErrorKind::NotFound => Startup::Missing,
        Err(err) => Startup::Invalid(err),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories_creates_parent() {
        let tmp = TempDir::new().expect("tempdir");
        let log_path = tmp.path().join(".devdash").join("logs").join("devdash.log");

        ensure_directories(&log_path).expect("create dirs");
        assert!(log_path.parent().unwrap().is_dir());
        assert!(!log_path.exists(), "only the directory is created");
    }

    #[test]
    fn test_ensure_directories_bare_file_name() {
        ensure_directories(Path::new("devdash.log")).expect("nothing to create");
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("info"), "info");
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("ERROR"), "error");
        assert_eq!(filter_directive("LOUD"), "info");
    }

    #[test]
    fn test_load_config_missing_file() {
        let tmp = TempDir::new().expect("tempdir");
        assert!(matches!(
            load_config(&tmp.path().join(".devdash.yml")),
            Startup::Missing
        ));
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join(".devdash.yml");
        std::fs::write(&path, "projects: [unclosed").unwrap();
        assert!(matches!(
            load_config(&path),
            Startup::Invalid(DashError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_config_ready() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join(".devdash.yml");
        std::fs::write(&path, "general:\n  refresh: 60\nprojects:\n  - name: site\n").unwrap();
        match load_config(&path) {
            Startup::Ready(config) => {
                assert_eq!(config.general.refresh, 60);
                assert_eq!(config.projects[0].name, "site");
            }
            other => panic!("unexpected startup {other:?}"),
        }
    }
}
