//! GitHub repository statistics through the REST API.

use std::collections::BTreeMap;

use async_trait::async_trait;
use devdash_core::color::Color;
use devdash_core::config::{Capability, GithubConfig, WidgetConfig};
use devdash_core::error::Result;
use devdash_core::options::{OPTION_FIRST_COLOR, OPTION_LIMIT, OPTION_SECOND_COLOR};
use devdash_core::widget::{BarSeries, StackedSeries};
use reqwest::{Client, RequestBuilder, Url};
use serde::Deserialize;

use crate::factory::ProviderWidget;
use crate::http::{construction_error, fetch_error, join_segments, parse_http_url, send_json};
use crate::widget_data::WidgetData;

const API_BASE: &str = "https://api.github.com";
const DEFAULT_LIMIT: usize = 10;
/// GitHub caps `per_page` at this value.
const MAX_PER_PAGE: usize = 100;

const WIDGETS: &[&str] = &[
    "box_stars",
    "table_issues",
    "bar_issue_labels",
    "stacked_issue_states",
];

#[derive(Debug, Deserialize)]
struct Repository {
    stargazers_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Issue {
    number: u64,
    title: String,
    state: String,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    labels: Vec<Label>,
    /// Present only when the entry is a pull request.
    #[serde(default)]
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
struct User {
    login: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Label {
    name: String,
}

pub struct GithubProvider {
    client: Client,
    base: Url,
    token: String,
    owner: String,
    repository: String,
}

impl GithubProvider {
    pub fn new(client: Client, config: &GithubConfig) -> Result<Self> {
        Self::with_base_url(client, config, API_BASE)
    }

    pub fn with_base_url(client: Client, config: &GithubConfig, base: &str) -> Result<Self> {
        if config.owner.trim().is_empty() {
            return Err(construction_error(Capability::Github, "owner is required"));
        }
        if config.repository.trim().is_empty() {
            return Err(construction_error(Capability::Github, "repository is required"));
        }
        Ok(Self {
            client,
            base: parse_http_url(Capability::Github, base)?,
            token: config.token.clone(),
            owner: config.owner.clone(),
            repository: config.repository.clone(),
        })
    }

    fn get(&self, tail: &[&str]) -> Result<RequestBuilder> {
        let mut segments = vec!["repos", self.owner.as_str(), self.repository.as_str()];
        segments.extend_from_slice(tail);
        let url = join_segments(Capability::Github, &self.base, &segments)?;
        let request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        Ok(if self.token.is_empty() {
            request
        } else {
            request.bearer_auth(&self.token)
        })
    }

    /// One full page of issues; pull requests share the endpoint and are dropped.
    async fn issues(&self, state: &str) -> Result<Vec<Issue>> {
        let per_page = MAX_PER_PAGE.to_string();
        let request = self.get(&["issues"])?.query(&[("state", state), ("per_page", per_page.as_str())]);
        let issues: Vec<Issue> = send_json(Capability::Github, request).await?;
        Ok(issues
            .into_iter()
            .filter(|i| i.pull_request.is_none())
            .collect())
    }
}

pub(crate) fn issue_rows(issues: &[Issue], limit: usize) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["#".to_string(), "Title".to_string(), "Author".to_string()]];
    rows.extend(issues.iter().take(limit).map(|i| {
        vec![
            i.number.to_string(),
            i.title.clone(),
            i.user.as_ref().map(|u| u.login.clone()).unwrap_or_default(),
        ]
    }));
    rows
}

/// Issue counts per label, busiest first, ties broken by name.
pub(crate) fn label_counts(issues: &[Issue], limit: usize) -> BarSeries {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for label in issues.iter().flat_map(|i| &i.labels) {
        *counts.entry(label.name.as_str()).or_default() += 1;
    }
    let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(limit);

    let (labels, values): (Vec<String>, Vec<u64>) = ranked
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .unzip();
    BarSeries::new(values, labels)
}

/// Open and closed issue counts per label. Unlabelled issues count under "none".
pub(crate) fn state_series(issues: &[Issue], limit: usize, colors: [Color; 2]) -> Result<StackedSeries> {
    let mut counts: BTreeMap<String, [u64; 2]> = BTreeMap::new();
    for issue in issues {
        let slot = usize::from(issue.state != "open");
        if issue.labels.is_empty() {
            counts.entry("none".to_string()).or_default()[slot] += 1;
        }
        for label in &issue.labels {
            counts.entry(label.name.clone()).or_default()[slot] += 1;
        }
    }
    let mut ranked: Vec<(String, [u64; 2])> = counts.into_iter().collect();
    ranked.sort_by(|a, b| (b.1[0] + b.1[1]).cmp(&(a.1[0] + a.1[1])).then(a.0.cmp(&b.0)));
    ranked.truncate(limit);

    let labels = ranked.iter().map(|(name, _)| name.clone()).collect();
    let open = ranked.iter().map(|(_, c)| c[0]).collect();
    let closed = ranked.iter().map(|(_, c)| c[1]).collect();
    StackedSeries::new(vec![open, closed], labels, colors.to_vec())
}

#[async_trait]
impl ProviderWidget for GithubProvider {
    fn capability(&self) -> Capability {
        Capability::Github
    }

    fn widgets(&self) -> &'static [&'static str] {
        WIDGETS
    }

    async fn fetch(&self, widget: &WidgetConfig) -> Result<WidgetData> {
        let limit = widget.options.int(OPTION_LIMIT, DEFAULT_LIMIT);
        match widget.kind() {
            "box_stars" => {
                let repo: Repository = send_json(Capability::Github, self.get(&[])?).await?;
                Ok(WidgetData::text("Stars", repo.stargazers_count.to_string()))
            }
            "table_issues" => {
                let issues = self.issues("open").await?;
                Ok(WidgetData::Table {
                    title: "Open issues".to_string(),
                    rows: issue_rows(&issues, limit),
                })
            }
            "bar_issue_labels" => {
                let issues = self.issues("open").await?;
                Ok(WidgetData::Bar {
                    title: "Issue labels".to_string(),
                    data: label_counts(&issues, limit),
                })
            }
            "stacked_issue_states" => {
                let issues = self.issues("all").await?;
                let colors = [
                    widget.options.color(OPTION_FIRST_COLOR, Color::Green),
                    widget.options.color(OPTION_SECOND_COLOR, Color::Red),
                ];
                Ok(WidgetData::Stacked {
                    title: "Issues open/closed".to_string(),
                    data: state_series(&issues, limit, colors)?,
                })
            }
            other => Err(fetch_error(Capability::Github, format!("unknown widget '{other}'"))),
        }
    }
}
