//! Google Search Console search analytics.

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use devdash_core::config::{Capability, SearchConsoleConfig, WidgetConfig};
use devdash_core::error::Result;
use devdash_core::options::OPTION_LIMIT;
use devdash_core::widget::BarSeries;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;

use crate::factory::ProviderWidget;
use crate::http::{construction_error, fetch_error, join_segments, parse_http_url, send_json};
use crate::widget_data::WidgetData;

const API_BASE: &str = "https://www.googleapis.com";
const DEFAULT_LIMIT: usize = 10;
const WINDOW_DAYS: i64 = 28;

const WIDGETS: &[&str] = &["table_queries", "bar_clicks"];

#[derive(Debug, Default, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    rows: Vec<QueryRow>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct QueryRow {
    #[serde(default)]
    keys: Vec<String>,
    #[serde(default)]
    clicks: f64,
    #[serde(default)]
    impressions: f64,
    #[serde(default)]
    ctr: f64,
    #[serde(default)]
    position: f64,
}

impl QueryRow {
    fn key(&self) -> &str {
        self.keys.first().map_or("", String::as_str)
    }
}

pub struct SearchConsoleProvider {
    client: Client,
    base: Url,
    token: String,
    site: String,
}

impl SearchConsoleProvider {
    pub fn new(client: Client, config: &SearchConsoleConfig) -> Result<Self> {
        Self::with_base_url(client, config, API_BASE)
    }

    pub fn with_base_url(client: Client, config: &SearchConsoleConfig, base: &str) -> Result<Self> {
        if config.token.is_empty() {
            return Err(construction_error(Capability::SearchConsole, "token is required"));
        }
        if config.address.is_empty() {
            return Err(construction_error(Capability::SearchConsole, "address is required"));
        }
        Ok(Self {
            client,
            base: parse_http_url(Capability::SearchConsole, base)?,
            token: config.token.clone(),
            site: config.address.clone(),
        })
    }

    async fn query(&self, dimension: &str, limit: usize, today: NaiveDate) -> Result<Vec<QueryRow>> {
        let url = join_segments(
            Capability::SearchConsole,
            &self.base,
            &["webmasters", "v3", "sites", self.site.as_str(), "searchAnalytics", "query"],
        )?;
        let (start, end) = date_window(today);
        let body = json!({
            "startDate": start.format("%Y-%m-%d").to_string(),
            "endDate": end.format("%Y-%m-%d").to_string(),
            "dimensions": [dimension],
            "rowLimit": limit,
        });
        let request = self.client.post(url).bearer_auth(&self.token).json(&body);
        let response: QueryResponse = send_json(Capability::SearchConsole, request).await?;
        Ok(response.rows)
    }
}

/// Inclusive start and end of the reporting window ending yesterday.
fn date_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = today - Duration::days(1);
    (end - Duration::days(WINDOW_DAYS - 1), end)
}

pub(crate) fn query_table(rows: &[QueryRow]) -> Vec<Vec<String>> {
    let header = ["Query", "Clicks", "Impressions", "CTR %", "Position"];
    let mut table: Vec<Vec<String>> = vec![header.iter().map(|h| h.to_string()).collect()];
    table.extend(rows.iter().map(|r| {
        vec![
            r.key().to_string(),
            format!("{:.0}", r.clicks),
            format!("{:.0}", r.impressions),
            format!("{:.2}", r.ctr * 100.0),
            format!("{:.1}", r.position),
        ]
    }));
    table
}

pub(crate) fn click_series(rows: &[QueryRow]) -> BarSeries {
    BarSeries::new(
        rows.iter().map(|r| r.clicks.max(0.0).round() as u64).collect(),
        rows.iter().map(|r| r.key().to_string()).collect(),
    )
}

#[async_trait]
impl ProviderWidget for SearchConsoleProvider {
    fn capability(&self) -> Capability {
        Capability::SearchConsole
    }

    fn widgets(&self) -> &'static [&'static str] {
        WIDGETS
    }

    async fn fetch(&self, widget: &WidgetConfig) -> Result<WidgetData> {
        let limit = widget.options.int(OPTION_LIMIT, DEFAULT_LIMIT).max(1);
        let today = Local::now().date_naive();
        match widget.kind() {
            "table_queries" => Ok(WidgetData::Table {
                title: "Top queries".to_string(),
                rows: query_table(&self.query("query", limit, today).await?),
            }),
            "bar_clicks" => Ok(WidgetData::Bar {
                title: "Clicks".to_string(),
                data: click_series(&self.query("query", limit, today).await?),
            }),
            other => Err(fetch_error(Capability::SearchConsole, format!("unknown widget '{other}'"))),
        }
    }
}
