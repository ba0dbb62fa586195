//! Google Analytics (GA4 Data API) daily user counts.

use async_trait::async_trait;
use chrono::NaiveDate;
use devdash_core::config::{AnalyticsConfig, Capability, WidgetConfig};
use devdash_core::error::Result;
use devdash_core::options::OPTION_LIMIT;
use devdash_core::widget::BarSeries;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;

use crate::factory::ProviderWidget;
use crate::http::{construction_error, fetch_error, join_segments, parse_http_url, send_json};
use crate::widget_data::WidgetData;

const API_BASE: &str = "https://analyticsdata.googleapis.com";
const DEFAULT_DAYS: u32 = 7;

const WIDGETS: &[&str] = &["bar_users", "box_total_users"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunReportResponse {
    #[serde(default)]
    rows: Vec<ReportRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRow {
    #[serde(default)]
    dimension_values: Vec<Value>,
    #[serde(default)]
    metric_values: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Value {
    #[serde(default)]
    value: String,
}

pub struct AnalyticsProvider {
    client: Client,
    base: Url,
    token: String,
    property_id: String,
}

impl AnalyticsProvider {
    pub fn new(client: Client, config: &AnalyticsConfig) -> Result<Self> {
        Self::with_base_url(client, config, API_BASE)
    }

    pub fn with_base_url(client: Client, config: &AnalyticsConfig, base: &str) -> Result<Self> {
        if config.token.is_empty() {
            return Err(construction_error(Capability::Analytics, "token is required"));
        }
        let property_id = config.property_id.trim();
        if property_id.is_empty() || !property_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(construction_error(
                Capability::Analytics,
                format!("property_id must be numeric, got '{}'", config.property_id),
            ));
        }
        Ok(Self {
            client,
            base: parse_http_url(Capability::Analytics, base)?,
            token: config.token.clone(),
            property_id: property_id.to_string(),
        })
    }

    /// Active users per day over the last `days` days, oldest first.
    async fn daily_users(&self, days: u32) -> Result<BarSeries> {
        let method = format!("{}:runReport", self.property_id);
        let url = join_segments(Capability::Analytics, &self.base, &["v1beta", "properties", method.as_str()])?;
        let body = json!({
            "dateRanges": [{ "startDate": format!("{}daysAgo", days.saturating_sub(1)), "endDate": "today" }],
            "dimensions": [{ "name": "date" }],
            "metrics": [{ "name": "activeUsers" }],
            "orderBys": [{ "dimension": { "dimensionName": "date" } }],
        });
        let request = self.client.post(url).bearer_auth(&self.token).json(&body);
        let report: RunReportResponse = send_json(Capability::Analytics, request).await?;
        to_series(report)
    }
}

fn to_series(report: RunReportResponse) -> Result<BarSeries> {
    let mut series = BarSeries::default();
    for row in report.rows {
        let (Some(date), Some(users)) = (row.dimension_values.first(), row.metric_values.first()) else {
            continue;
        };
        let users = users
            .value
            .parse::<u64>()
            .map_err(|e| fetch_error(Capability::Analytics, format!("bad user count '{}': {e}", users.value)))?;
        series.labels.push(date_label(&date.value));
        series.values.push(users);
    }
    Ok(series)
}

/// `20240131` becomes `01-31`; anything else passes through.
fn date_label(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map(|d| d.format("%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[async_trait]
impl ProviderWidget for AnalyticsProvider {
    fn capability(&self) -> Capability {
        Capability::Analytics
    }

    fn widgets(&self) -> &'static [&'static str] {
        WIDGETS
    }

    async fn fetch(&self, widget: &WidgetConfig) -> Result<WidgetData> {
        let days = widget.options.int(OPTION_LIMIT, DEFAULT_DAYS).max(1);
        match widget.kind() {
            "bar_users" => Ok(WidgetData::Bar {
                title: "Users".to_string(),
                data: self.daily_users(days).await?,
            }),
            "box_total_users" => {
                let total: u64 = self.daily_users(days).await?.values.iter().sum();
                Ok(WidgetData::text("Total users", total.to_string()))
            }
            other => Err(fetch_error(Capability::Analytics, format!("unknown widget '{other}'"))),
        }
    }
}
