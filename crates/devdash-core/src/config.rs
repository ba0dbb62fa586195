//! Dashboard configuration file model.
//!
//! The file is read once at startup. Styling options stay untyped
//! ([`OptionMap`]) until a widget is drawn; everything structural is typed here.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DashError, Result};
use crate::options::OptionMap;

pub const DEFAULT_CONFIG_FILE: &str = ".devdash.yml";
pub const DEFAULT_REFRESH_SECS: u64 = 600;
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_QUIT_KEY: &str = "C-c";

// ── Top level ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub projects: Vec<ProjectConfig>,
}

impl Config {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DashError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct General {
    /// Seconds between refresh passes.
    pub refresh: u64,
    /// Seconds a single provider fetch may take.
    pub provider_timeout: u64,
    pub keys: Keys,
}

impl Default for General {
    fn default() -> Self {
        Self {
            refresh: DEFAULT_REFRESH_SECS,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT_SECS,
            keys: Keys::default(),
        }
    }
}

impl General {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.max(1))
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Keys {
    pub quit: String,
}

impl Default for Keys {
    fn default() -> Self {
        Self {
            quit: DEFAULT_QUIT_KEY.to_string(),
        }
    }
}

// ── Projects ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub title_options: OptionMap,
    pub services: Services,
    /// Named option sets shared by the project's widgets.
    pub themes: BTreeMap<String, OptionMap>,
    pub widgets: Vec<RowConfig>,
}

impl ProjectConfig {
    /// Every widget of the project in row, column, stack order.
    pub fn widgets_in_order(&self) -> impl Iterator<Item = &WidgetConfig> {
        self.widgets
            .iter()
            .flat_map(|r| r.row.iter())
            .flat_map(|c| c.col.elements.iter())
    }

    /// The widget with its theme applied underneath its own options.
    ///
    /// A widget names its theme with `theme:`; without one, a theme keyed by
    /// its widget family (`bar` for `ga.bar_users`) applies if declared.
    pub fn themed(&self, widget: &WidgetConfig) -> WidgetConfig {
        let theme = match &widget.theme {
            Some(name) => self.themes.get(name),
            None => self.themes.get(widget.family()),
        };
        match theme {
            Some(base) => WidgetConfig {
                options: base.overlay(&widget.options),
                ..widget.clone()
            },
            None => widget.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RowConfig {
    pub row: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub col: ColumnSpec,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ColumnSpec {
    /// Size token, see [`crate::size::resolve`].
    pub size: String,
    pub elements: Vec<WidgetConfig>,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            size: "xxl".to_string(),
            elements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WidgetConfig {
    /// `<provider>.<widget>`, e.g. `mon.box_availability`.
    pub name: String,
    pub theme: Option<String>,
    pub options: OptionMap,
}

impl WidgetConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            theme: None,
            options: OptionMap::new(),
        }
    }

    /// Capability named by the widget's prefix.
    pub fn capability(&self) -> Option<Capability> {
        let (prefix, _) = self.name.split_once('.')?;
        Capability::from_prefix(prefix)
    }

    /// Widget name without its provider prefix.
    pub fn kind(&self) -> &str {
        self.name
            .split_once('.')
            .map_or(self.name.as_str(), |(_, kind)| kind)
    }

    /// Leading word of the kind: `box`, `bar`, `table`, `stacked`.
    pub fn family(&self) -> &str {
        self.kind().split('_').next().unwrap_or_default()
    }
}

// ── Services ──────────────────────────────────────────────────────────────────

/// Provider integrations, in the fixed order they are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    Analytics,
    SearchConsole,
    Monitor,
    Github,
}

impl Capability {
    pub const ORDER: [Capability; 4] = [
        Capability::Analytics,
        Capability::SearchConsole,
        Capability::Monitor,
        Capability::Github,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Capability::Analytics => "ga",
            Capability::SearchConsole => "gsc",
            Capability::Monitor => "mon",
            Capability::Github => "github",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ORDER.into_iter().find(|c| c.prefix() == prefix)
    }

    pub fn name(self) -> &'static str {
        match self {
            Capability::Analytics => "Google Analytics",
            Capability::SearchConsole => "Google Search Console",
            Capability::Monitor => "Monitor",
            Capability::Github => "GitHub",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Services {
    pub google_analytics: AnalyticsConfig,
    pub google_search_console: SearchConsoleConfig,
    pub monitor: MonitorConfig,
    pub github: GithubConfig,
}

/// A bound provider configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceConfig {
    Analytics(AnalyticsConfig),
    SearchConsole(SearchConsoleConfig),
    Monitor(MonitorConfig),
    Github(GithubConfig),
}

impl ServiceConfig {
    pub fn capability(&self) -> Capability {
        match self {
            ServiceConfig::Analytics(_) => Capability::Analytics,
            ServiceConfig::SearchConsole(_) => Capability::SearchConsole,
            ServiceConfig::Monitor(_) => Capability::Monitor,
            ServiceConfig::Github(_) => Capability::Github,
        }
    }
}

impl Services {
    /// One slot per capability in [`Capability::ORDER`]; empty services are `None`.
    pub fn slots(&self) -> [Option<ServiceConfig>; 4] {
        [
            (!self.google_analytics.is_empty())
                .then(|| ServiceConfig::Analytics(self.google_analytics.clone())),
            (!self.google_search_console.is_empty())
                .then(|| ServiceConfig::SearchConsole(self.google_search_console.clone())),
            (!self.monitor.is_empty()).then(|| ServiceConfig::Monitor(self.monitor.clone())),
            (!self.github.is_empty()).then(|| ServiceConfig::Github(self.github.clone())),
        ]
    }

    pub fn bound(&self) -> impl Iterator<Item = ServiceConfig> {
        self.slots().into_iter().flatten()
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// OAuth bearer token with the analytics read-only scope.
    pub token: String,
    pub property_id: String,
}

impl AnalyticsConfig {
    pub fn is_empty(&self) -> bool {
        self.token.is_empty() && self.property_id.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConsoleConfig {
    pub token: String,
    /// Site URL as registered in Search Console.
    pub address: String,
}

impl SearchConsoleConfig {
    pub fn is_empty(&self) -> bool {
        self.token.is_empty() && self.address.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MonitorConfig {
    pub address: String,
}

impl MonitorConfig {
    pub fn is_empty(&self) -> bool {
        self.address.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GithubConfig {
    pub token: String,
    pub owner: String,
    pub repository: String,
}

impl GithubConfig {
    pub fn is_empty(&self) -> bool {
        self.token.is_empty() && self.owner.is_empty() && self.repository.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
