use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// A highly configurable terminal dashboard for developers
#[derive(Parser, Debug, Clone)]
#[command(
    name = "devdash",
    about = "A highly configurable terminal dashboard for developers",
    version
)]
pub struct Settings {
    /// The config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Debug mode
    #[arg(long)]
    pub debug: bool,

    /// Display terminal dimensions and exit
    #[arg(long)]
    pub term: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path (defaults to ~/.devdash/logs/devdash.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Log file path, defaulting to `~/.devdash/logs/devdash.log`.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".devdash")
                .join("logs")
                .join("devdash.log")
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
