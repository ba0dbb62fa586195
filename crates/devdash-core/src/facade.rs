//! Widget Façade.
//!
//! [`Tui`] exposes one method per widget kind. Each resolves the widget's
//! [`OptionMap`] into its typed style and forwards exactly one draw call to
//! the wrapped [`Drawer`]. Payloads are passed through untouched.

use tracing::debug;

use crate::backend::Drawer;
use crate::error::Result;
use crate::options::OptionMap;
use crate::size;
use crate::style::{BarChartStyle, StackedBarChartStyle, TableStyle, TextBoxStyle, TitleStyle};
use crate::widget::{BarSeries, StackedSeries};

pub struct Tui<D: Drawer> {
    drawer: D,
}

impl<D: Drawer> Tui<D> {
    pub fn new(drawer: D) -> Self {
        Self { drawer }
    }

    pub fn drawer(&self) -> &D {
        &self.drawer
    }

    pub fn into_inner(self) -> D {
        self.drawer
    }

    /// Draw the project title banner.
    ///
    /// Fails on a non-boolean `bold` or an unresolvable `size`.
    pub fn add_project_title(&mut self, title: &str, options: &OptionMap) -> Result<()> {
        let style = TitleStyle::resolve(options)?;
        debug!(title, size = style.size, "drawing project title");
        self.drawer.title(title.to_string(), style);
        Ok(())
    }

    pub fn add_text_box(&mut self, data: impl Into<String>, title: impl Into<String>, options: &OptionMap) {
        let style = TextBoxStyle::resolve(options);
        self.drawer.text_box(title.into(), data.into(), style);
    }

    pub fn add_bar_chart(&mut self, data: BarSeries, title: impl Into<String>, options: &OptionMap) {
        let style = BarChartStyle::resolve(options);
        self.drawer.bar_chart(title.into(), data, style);
    }

    pub fn add_stacked_bar_chart(
        &mut self,
        data: StackedSeries,
        title: impl Into<String>,
        options: &OptionMap,
    ) {
        let style = StackedBarChartStyle::resolve(options);
        self.drawer.stacked_bar_chart(title.into(), data, style);
    }

    pub fn add_table(&mut self, rows: Vec<Vec<String>>, title: impl Into<String>, options: &OptionMap) {
        let style = TableStyle::resolve(options);
        self.drawer.table(title.into(), rows, style);
    }

    /// Append a column sized by a t-shirt or integer token.
    pub fn add_col(&mut self, size: &str) -> Result<()> {
        let units = size::resolve(size)?;
        self.drawer.add_col(units);
        Ok(())
    }

    pub fn add_row(&mut self) {
        self.drawer.add_row();
    }
}
