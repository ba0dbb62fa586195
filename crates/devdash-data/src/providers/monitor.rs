//! Uptime monitor: pings one address and reports whether it answers.

use std::time::Instant;

use async_trait::async_trait;
use devdash_core::config::{Capability, MonitorConfig, WidgetConfig};
use devdash_core::error::Result;
use reqwest::{Client, StatusCode, Url};

use crate::factory::ProviderWidget;
use crate::http::{fetch_error, parse_http_url};
use crate::widget_data::WidgetData;

const WIDGETS: &[&str] = &["box_availability", "box_response_time"];

pub struct MonitorProvider {
    client: Client,
    url: Url,
}

/// Outcome of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Answered { status: StatusCode, millis: u128 },
    Unreachable(String),
}

impl Probe {
    pub fn availability(&self) -> String {
        match self {
            Probe::Answered { status, .. } if status.is_success() || status.is_redirection() => {
                "online".to_string()
            }
            Probe::Answered { status, .. } => format!("offline ({})", status.as_u16()),
            Probe::Unreachable(_) => "offline".to_string(),
        }
    }

    pub fn response_time(&self) -> String {
        match self {
            Probe::Answered { millis, .. } => format!("{millis} ms"),
            Probe::Unreachable(_) => "-".to_string(),
        }
    }
}

impl MonitorProvider {
    pub fn new(client: Client, config: &MonitorConfig) -> Result<Self> {
        let url = parse_http_url(Capability::Monitor, &config.address)?;
        Ok(Self { client, url })
    }

    async fn probe(&self) -> Probe {
        let started = Instant::now();
        match self.client.get(self.url.clone()).send().await {
            Ok(response) => Probe::Answered {
                status: response.status(),
                millis: started.elapsed().as_millis(),
            },
            Err(e) => {
                tracing::debug!(url = %self.url, error = %e, "monitor probe failed");
                Probe::Unreachable(e.to_string())
            }
        }
    }
}

#[async_trait]
impl ProviderWidget for MonitorProvider {
    fn capability(&self) -> Capability {
        Capability::Monitor
    }

    fn widgets(&self) -> &'static [&'static str] {
        WIDGETS
    }

    async fn fetch(&self, widget: &WidgetConfig) -> Result<WidgetData> {
        match widget.kind() {
            "box_availability" => Ok(WidgetData::text("Availability", self.probe().await.availability())),
            "box_response_time" => Ok(WidgetData::text("Response time", self.probe().await.response_time())),
            other => Err(fetch_error(Capability::Monitor, format!("unknown widget '{other}'"))),
        }
    }
}
