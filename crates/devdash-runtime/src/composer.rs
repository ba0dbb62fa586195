//! Project composer.
//!
//! Turns one [`ProjectConfig`] into draw calls: the title banner first, then
//! every configured widget in row/column order. Providers are built fresh for
//! each pass and queried in [`Capability::ORDER`]. A provider that cannot be
//! built loses its own widgets and is reported in an error row under the
//! title; a widget whose fetch fails is drawn as an error box in its slot so
//! the layout stays put.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use devdash_core::backend::Drawer;
use devdash_core::config::{Capability, ProjectConfig, WidgetConfig};
use devdash_core::error::{DashError, Result};
use devdash_core::facade::Tui;
use devdash_core::layout::Layout;
use devdash_core::options::{OptionMap, OPTION_BORDER_COLOR, OPTION_TITLE_COLOR};
use devdash_data::{ProviderFactory, ProviderWidget, WidgetData};
use tokio::time;
use tracing::{debug, warn};

type Bindings = BTreeMap<Capability, Box<dyn ProviderWidget>>;

const ERROR_ROW_SIZE: &str = "xxl";

pub struct Composer<F: ?Sized> {
    factory: Arc<F>,
    timeout: Duration,
}

impl<F: ProviderFactory + ?Sized> Composer<F> {
    pub fn new(factory: Arc<F>, timeout: Duration) -> Self {
        Self { factory, timeout }
    }

    /// Compose every project, in declaration order, into one layout.
    pub async fn compose_all(&self, projects: &[ProjectConfig]) -> Result<Layout> {
        let mut tui = Tui::new(Layout::new());
        for project in projects {
            self.compose(project, &mut tui).await?;
        }
        Ok(tui.into_inner())
    }

    /// Draw one project.
    ///
    /// Title and column sizes are resolved eagerly; either failing aborts the
    /// project with the error.
    pub async fn compose<D: Drawer + Send>(&self, project: &ProjectConfig, tui: &mut Tui<D>) -> Result<()> {
        tui.add_project_title(&project.name, &project.title_options)?;

        let (bindings, failures) = self.bind(project);
        if !failures.is_empty() {
            tui.add_row();
            tui.add_col(ERROR_ROW_SIZE)?;
            for (capability, err) in &failures {
                draw_error_box(tui, capability.name(), err);
            }
        }

        let widgets: Vec<WidgetConfig> = project.widgets_in_order().map(|w| project.themed(w)).collect();
        let mut fetched = self.fetch_all(project, &widgets, &bindings).await;

        let mut index = 0;
        for row in &project.widgets {
            tui.add_row();
            for column in &row.row {
                tui.add_col(&column.col.size)?;
                for _ in &column.col.elements {
                    let widget = &widgets[index];
                    match fetched[index].take() {
                        Some(Ok(data)) => data.draw(tui, &widget.options),
                        Some(Err(err)) => {
                            warn!(widget = %widget.name, error = %err, "widget fetch failed");
                            draw_error_box(tui, &widget.name, &err);
                        }
                        None => {}
                    }
                    index += 1;
                }
            }
        }
        Ok(())
    }

    /// Build a provider for every bound service.
    ///
    /// Services that fail to build are returned alongside, in fetch order.
    fn bind(&self, project: &ProjectConfig) -> (Bindings, Vec<(Capability, DashError)>) {
        let mut bindings = Bindings::new();
        let mut failures = Vec::new();
        for service in project.services.bound() {
            let capability = service.capability();
            match self.factory.build(&service) {
                Ok(provider) => {
                    bindings.insert(capability, provider);
                }
                Err(err) => {
                    warn!(
                        project = %project.name,
                        provider = %capability,
                        error = %err,
                        "provider unavailable; omitting its widgets"
                    );
                    failures.push((capability, err));
                }
            }
        }
        (bindings, failures)
    }

    /// Fetch data for every widget, provider by provider.
    ///
    /// The result is indexed like `widgets`; `None` marks a widget that is
    /// not drawn.
    async fn fetch_all(
        &self,
        project: &ProjectConfig,
        widgets: &[WidgetConfig],
        bindings: &Bindings,
    ) -> Vec<Option<Result<WidgetData>>> {
        let plan: Vec<Option<Capability>> = widgets.iter().map(|w| plan_widget(project, bindings, w)).collect();

        let mut fetched: Vec<Option<Result<WidgetData>>> = widgets.iter().map(|_| None).collect();
        for capability in Capability::ORDER {
            let Some(provider) = bindings.get(&capability) else {
                continue;
            };
            for (index, widget) in widgets.iter().enumerate() {
                if plan[index] == Some(capability) {
                    fetched[index] = Some(self.fetch_one(provider.as_ref(), widget).await);
                }
            }
        }
        fetched
    }

    async fn fetch_one(&self, provider: &dyn ProviderWidget, widget: &WidgetConfig) -> Result<WidgetData> {
        debug!(widget = %widget.name, "fetching widget data");
        match time::timeout(self.timeout, provider.fetch(widget)).await {
            Ok(result) => result,
            Err(_) => Err(DashError::ProviderTimeout {
                provider: provider.capability().name().to_string(),
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

/// The capability that will fetch `widget`, or `None` when it is skipped.
fn plan_widget(project: &ProjectConfig, bindings: &Bindings, widget: &WidgetConfig) -> Option<Capability> {
    let Some(capability) = widget.capability() else {
        warn!(widget = %widget.name, "unknown widget provider; skipping");
        return None;
    };
    if !project.services.bound().any(|s| s.capability() == capability) {
        warn!(widget = %widget.name, provider = %capability, "widget names an unconfigured service; skipping");
        return None;
    }
    // A provider that failed to build was already reported.
    let provider = bindings.get(&capability)?;
    if !provider.supports(widget) {
        warn!(widget = %widget.name, "unknown widget; skipping");
        return None;
    }
    Some(capability)
}

fn draw_error_box<D: Drawer>(tui: &mut Tui<D>, title: &str, err: &DashError) {
    let mut options = OptionMap::new();
    options.insert(OPTION_BORDER_COLOR, "red");
    options.insert(OPTION_TITLE_COLOR, "red");
    tui.add_text_box(err.to_string(), title, &options);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use devdash_core::color::Color;
    use devdash_core::config::{ColumnConfig, ColumnSpec, RowConfig, ServiceConfig, Services};
    use devdash_core::widget::Widget;

    // ── Fakes ─────────────────────────────────────────────────────────────

    struct FakeProvider {
        capability: Capability,
        delay: Duration,
        fetches: Arc<Mutex<Vec<Capability>>>,
    }

    #[async_trait]
    impl ProviderWidget for FakeProvider {
        fn capability(&self) -> Capability {
            self.capability
        }

        fn widgets(&self) -> &'static [&'static str] {
            &["box_ok", "box_fail"]
        }

        async fn fetch(&self, widget: &WidgetConfig) -> Result<WidgetData> {
            self.fetches.lock().unwrap().push(self.capability);
            time::sleep(self.delay).await;
            match widget.kind() {
                "box_ok" => Ok(WidgetData::text(self.capability.name(), "ok")),
                _ => Err(DashError::ProviderFetch {
                    provider: self.capability.name().to_string(),
                    message: "boom".into(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct FakeFactory {
        builds: AtomicUsize,
        broken: Option<Capability>,
        delay: Duration,
        fetches: Arc<Mutex<Vec<Capability>>>,
    }

    impl ProviderFactory for FakeFactory {
        fn build(&self, service: &ServiceConfig) -> Result<Box<dyn ProviderWidget>> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            let capability = service.capability();
            if self.broken == Some(capability) {
                return Err(DashError::ProviderConstruction {
                    provider: capability.name().to_string(),
                    message: "bad credentials".into(),
                });
            }
            Ok(Box::new(FakeProvider {
                capability,
                delay: self.delay,
                fetches: Arc::clone(&self.fetches),
            }))
        }
    }

    fn column(size: &str, names: &[&str]) -> ColumnConfig {
        ColumnConfig {
            col: ColumnSpec {
                size: size.to_string(),
                elements: names.iter().map(|n| WidgetConfig::new(*n)).collect(),
            },
        }
    }

    fn project(services: Services, rows: Vec<Vec<ColumnConfig>>) -> ProjectConfig {
        ProjectConfig {
            name: "site".into(),
            services,
            widgets: rows.into_iter().map(|row| RowConfig { row }).collect(),
            ..ProjectConfig::default()
        }
    }

    fn monitor_and_github() -> Services {
        let mut services = Services::default();
        services.monitor.address = "https://example.com".into();
        services.github.owner = "acme".into();
        services.github.repository = "rocket".into();
        services
    }

    fn composer(factory: FakeFactory) -> Composer<FakeFactory> {
        Composer::new(Arc::new(factory), Duration::from_secs(5))
    }

    // ── Tests ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_title_then_widgets_in_declared_layout() {
        let project = project(
            monitor_and_github(),
            vec![
                vec![column("m", &["mon.box_ok"]), column("m", &["github.box_ok"])],
                vec![column("xxl", &["github.box_ok"])],
            ],
        );
        let layout = composer(FakeFactory::default())
            .compose_all(std::slice::from_ref(&project))
            .await
            .unwrap();

        assert_eq!(layout.rows().len(), 3);
        assert!(matches!(layout.rows()[0].columns[0].widgets[0], Widget::Title { .. }));
        assert_eq!(layout.rows()[1].columns.len(), 2);
        assert_eq!(layout.rows()[1].columns[0].units, 6);
        match &layout.rows()[1].columns[1].widgets[0] {
            Widget::TextBox { title, text, .. } => {
                assert_eq!(title, "GitHub");
                assert_eq!(text, "ok");
            }
            other => panic!("unexpected widget {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_services_never_build_providers() {
        let factory = Arc::new(FakeFactory::default());
        let project = project(Services::default(), vec![vec![column("xxl", &["mon.box_ok"])]]);
        let layout = Composer::new(Arc::clone(&factory), Duration::from_secs(5))
            .compose_all(&[project])
            .await
            .unwrap();

        assert_eq!(factory.builds.load(Ordering::SeqCst), 0);
        assert_eq!(layout.widgets().count(), 1, "only the title is drawn");
    }

    #[tokio::test]
    async fn test_construction_failure_omits_only_that_provider() {
        let factory = FakeFactory {
            broken: Some(Capability::Github),
            ..FakeFactory::default()
        };
        let project = project(
            monitor_and_github(),
            vec![vec![column("xxl", &["mon.box_ok", "github.box_ok"])]],
        );
        let layout = composer(factory).compose_all(&[project]).await.unwrap();

        let titles: Vec<&str> = layout
            .widgets()
            .filter_map(|w| match w {
                Widget::TextBox { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(titles, vec!["GitHub", "Monitor"]);

        // The failure is reported in its own row between title and widgets.
        assert_eq!(layout.rows().len(), 3);
        assert_eq!(layout.rows()[1].columns[0].units, 12);
        match &layout.rows()[1].columns[0].widgets[0] {
            Widget::TextBox { text, style, .. } => {
                assert!(text.contains("bad credentials"));
                assert_eq!(style.border_color, Color::Red);
                assert_eq!(style.title_color, Color::Red);
            }
            other => panic!("unexpected widget {other:?}"),
        }
        assert_eq!(layout.rows()[2].columns[0].widgets.len(), 1);
    }

    #[tokio::test]
    async fn test_no_error_row_when_all_providers_build() {
        let project = project(monitor_and_github(), vec![vec![column("xxl", &["mon.box_ok"])]]);
        let layout = composer(FakeFactory::default()).compose_all(&[project]).await.unwrap();
        assert_eq!(layout.rows().len(), 2);
    }

    #[tokio::test]
    async fn test_providers_fetch_in_fixed_order() {
        let factory = Arc::new(FakeFactory::default());
        let mut services = monitor_and_github();
        services.google_analytics.token = "secret".into();
        services.google_analytics.property_id = "1234".into();
        let project = project(
            services,
            vec![
                vec![column("m", &["github.box_ok"]), column("m", &["mon.box_ok"])],
                vec![column("xxl", &["ga.box_ok", "github.box_ok"])],
            ],
        );
        let layout = Composer::new(Arc::clone(&factory), Duration::from_secs(5))
            .compose_all(&[project])
            .await
            .unwrap();

        assert_eq!(
            *factory.fetches.lock().unwrap(),
            vec![
                Capability::Analytics,
                Capability::Monitor,
                Capability::Github,
                Capability::Github
            ]
        );
        // Drawing still follows the declared layout.
        match &layout.rows()[1].columns[0].widgets[0] {
            Widget::TextBox { title, .. } => assert_eq!(title, "GitHub"),
            other => panic!("unexpected widget {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_theme_options_reach_drawn_widget() {
        let mut project = project(monitor_and_github(), vec![vec![column("xxl", &["mon.box_ok"])]]);
        let theme: OptionMap = [("border_color", "magenta"), ("text_color", "cyan")].into_iter().collect();
        project.themes.insert("box".into(), theme);
        project.widgets[0].row[0].col.elements[0]
            .options
            .insert("text_color", "yellow");

        let layout = composer(FakeFactory::default()).compose_all(&[project]).await.unwrap();
        match &layout.rows()[1].columns[0].widgets[0] {
            Widget::TextBox { style, .. } => {
                assert_eq!(style.border_color, Color::Magenta);
                assert_eq!(style.text_color, Color::Yellow);
            }
            other => panic!("unexpected widget {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_draws_error_box_in_place() {
        let project = project(
            monitor_and_github(),
            vec![vec![column("xxl", &["mon.box_fail", "github.box_ok"])]],
        );
        let layout = composer(FakeFactory::default()).compose_all(&[project]).await.unwrap();

        match &layout.rows()[1].columns[0].widgets[0] {
            Widget::TextBox { title, text, style } => {
                assert_eq!(title, "mon.box_fail");
                assert!(text.contains("boom"));
                assert_eq!(style.border_color, Color::Red);
            }
            other => panic!("unexpected widget {other:?}"),
        }
        assert_eq!(layout.rows()[1].columns[0].widgets.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_and_unbound_widgets_are_skipped() {
        let mut services = Services::default();
        services.monitor.address = "https://example.com".into();
        let project = project(
            services,
            vec![vec![column("xxl", &["mon.box_nope", "ga.bar_users", "plain", "mon.box_ok"])]],
        );
        let layout = composer(FakeFactory::default()).compose_all(&[project]).await.unwrap();
        assert_eq!(layout.rows()[1].columns[0].widgets.len(), 1);
    }

    #[tokio::test]
    async fn test_bad_column_size_is_fatal() {
        let project = project(monitor_and_github(), vec![vec![column("huge", &["mon.box_ok"])]]);
        let err = composer(FakeFactory::default())
            .compose_all(&[project])
            .await
            .unwrap_err();
        assert!(err.is_fatal_to_pass());
    }

    #[tokio::test]
    async fn test_bad_title_bold_is_fatal() {
        let mut project = project(Services::default(), vec![]);
        project.title_options.insert("bold", "maybe");
        let err = composer(FakeFactory::default())
            .compose_all(&[project])
            .await
            .unwrap_err();
        assert!(matches!(err, DashError::ConfigValidation { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_fetch_times_out() {
        let factory = FakeFactory {
            delay: Duration::from_secs(60),
            ..FakeFactory::default()
        };
        let project = project(monitor_and_github(), vec![vec![column("xxl", &["mon.box_ok"])]]);
        let layout = Composer::new(Arc::new(factory), Duration::from_secs(2))
            .compose_all(&[project])
            .await
            .unwrap();

        match &layout.rows()[1].columns[0].widgets[0] {
            Widget::TextBox { text, .. } => assert!(text.contains("did not answer within 2s")),
            other => panic!("unexpected widget {other:?}"),
        }
    }

    #[test]
    fn test_services_bound_order() {
        let services = monitor_and_github();
        let order: Vec<Capability> = services.bound().map(|s| s.capability()).collect();
        assert_eq!(order, vec![Capability::Monitor, Capability::Github]);
    }
}
