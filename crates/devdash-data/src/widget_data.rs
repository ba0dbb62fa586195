//! Render-ready widget payloads produced by providers.

use devdash_core::backend::Drawer;
use devdash_core::facade::Tui;
use devdash_core::options::{OptionMap, OPTION_TITLE};
use devdash_core::widget::{BarSeries, StackedSeries};

/// Data for one widget, tagged with the widget kind that displays it.
///
/// `title` is the provider's default; a `title` option overrides it.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetData {
    Text { title: String, text: String },
    Bar { title: String, data: BarSeries },
    Stacked { title: String, data: StackedSeries },
    Table { title: String, rows: Vec<Vec<String>> },
}

impl WidgetData {
    pub fn text(title: impl Into<String>, text: impl Into<String>) -> Self {
        WidgetData::Text {
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            WidgetData::Text { title, .. }
            | WidgetData::Bar { title, .. }
            | WidgetData::Stacked { title, .. }
            | WidgetData::Table { title, .. } => title,
        }
    }

    /// Hand the payload to the matching façade method.
    pub fn draw<D: Drawer>(self, tui: &mut Tui<D>, options: &OptionMap) {
        match self {
            WidgetData::Text { title, text } => {
                tui.add_text_box(text, options.text(OPTION_TITLE, &title), options)
            }
            WidgetData::Bar { title, data } => {
                tui.add_bar_chart(data, options.text(OPTION_TITLE, &title), options)
            }
            WidgetData::Stacked { title, data } => {
                tui.add_stacked_bar_chart(data, options.text(OPTION_TITLE, &title), options)
            }
            WidgetData::Table { title, rows } => {
                tui.add_table(rows, options.text(OPTION_TITLE, &title), options)
            }
        }
    }
}
