//! HTTP-backed provider integrations.

mod analytics;
mod github;
mod monitor;
mod search_console;

pub use analytics::AnalyticsProvider;
pub use github::GithubProvider;
pub use monitor::{MonitorProvider, Probe};
pub use search_console::SearchConsoleProvider;
