//! Provider capability trait and the factory that builds providers from config.

use async_trait::async_trait;
use devdash_core::config::{Capability, ServiceConfig, WidgetConfig};
use devdash_core::error::{DashError, Result};
use reqwest::Client;

use crate::http::build_client;
use crate::providers::{AnalyticsProvider, GithubProvider, MonitorProvider, SearchConsoleProvider};
use crate::widget_data::WidgetData;

/// One bound integration able to produce data for its widgets.
#[async_trait]
pub trait ProviderWidget: Send + Sync {
    fn capability(&self) -> Capability;

    /// Widget kinds (name without prefix) this provider can fetch.
    fn widgets(&self) -> &'static [&'static str];

    fn supports(&self, widget: &WidgetConfig) -> bool {
        self.widgets().contains(&widget.kind())
    }

    /// Fetch render-ready data for one widget. May perform network I/O.
    async fn fetch(&self, widget: &WidgetConfig) -> Result<WidgetData>;
}

/// Builds a provider from its configuration.
pub trait ProviderFactory: Send + Sync {
    fn build(&self, service: &ServiceConfig) -> Result<Box<dyn ProviderWidget>>;
}

/// Factory for the real HTTP-backed providers.
///
/// Providers are cheap to build; they share one connection pool.
#[derive(Clone)]
pub struct HttpProviderFactory {
    client: Client,
}

impl HttpProviderFactory {
    pub fn new() -> Result<Self> {
        let client = build_client().map_err(|e| DashError::ProviderConstruction {
            provider: "http client".to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn build(&self, service: &ServiceConfig) -> Result<Box<dyn ProviderWidget>> {
        let client = self.client.clone();
        Ok(match service {
            ServiceConfig::Analytics(cfg) => Box::new(AnalyticsProvider::new(client, cfg)?),
            ServiceConfig::SearchConsole(cfg) => Box::new(SearchConsoleProvider::new(client, cfg)?),
            ServiceConfig::Monitor(cfg) => Box::new(MonitorProvider::new(client, cfg)?),
            ServiceConfig::Github(cfg) => Box::new(GithubProvider::new(client, cfg)?),
        })
    }
}
