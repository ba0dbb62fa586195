use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the dashboard crates.
#[derive(Error, Debug)]
pub enum DashError {
    /// A boolean option held a value that is not a recognised boolean.
    #[error("can't convert {value} to bool for option '{key}' - please verify your configuration (correct values: true or false)")]
    ConfigValidation { key: String, value: String },

    /// A size token is neither a t-shirt size nor an integer.
    #[error("invalid size '{token}': {source}")]
    SizeResolution {
        token: String,
        #[source]
        source: ParseIntError,
    },

    /// A size token parsed but does not fit a layout unit count.
    #[error("size '{0}' is out of range")]
    SizeOutOfRange(String),

    /// A data provider could not be built from its configuration.
    #[error("Failed to set up {provider}: {message}")]
    ProviderConstruction { provider: String, message: String },

    /// A data provider failed while fetching widget data.
    #[error("{provider} fetch failed: {message}")]
    ProviderFetch { provider: String, message: String },

    /// A data provider did not answer within its time budget.
    #[error("{provider} did not answer within {secs}s")]
    ProviderTimeout { provider: String, secs: u64 },

    /// The terminal session could not be started.
    #[error("Terminal error: {0}")]
    BackendInit(#[source] std::io::Error),

    /// A stacked bar chart was given more series than it can draw.
    #[error("stacked bar chart supports at most 8 series, got {0}")]
    TooManySeries(usize),

    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the dashboard schema.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashError {
    /// Errors that abort a whole project render and must be shown on screen.
    pub fn is_fatal_to_pass(&self) -> bool {
        matches!(
            self,
            DashError::ConfigValidation { .. }
                | DashError::SizeResolution { .. }
                | DashError::SizeOutOfRange(_)
                | DashError::BackendInit(_)
        )
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashError>;
