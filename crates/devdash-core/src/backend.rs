//! Rendering Backend contract.
//!
//! The façade only ever talks to these traits. Every primitive takes fully
//! resolved, typed parameters; no raw option strings cross this boundary.

use crate::error::Result;
use crate::style::{BarChartStyle, StackedBarChartStyle, TableStyle, TextBoxStyle, TitleStyle};
use crate::widget::{BarSeries, StackedSeries};

/// Widget placement primitives.
pub trait Drawer {
    /// Draw a project title in a row of its own, `style.size` units wide.
    fn title(&mut self, text: String, style: TitleStyle);
    fn text_box(&mut self, title: String, text: String, style: TextBoxStyle);
    fn bar_chart(&mut self, title: String, data: BarSeries, style: BarChartStyle);
    fn stacked_bar_chart(&mut self, title: String, data: StackedSeries, style: StackedBarChartStyle);
    fn table(&mut self, title: String, rows: Vec<Vec<String>>, style: TableStyle);
    /// Append a column `units` wide to the last row.
    fn add_col(&mut self, units: u16);
    /// Append an empty row.
    fn add_row(&mut self);
}

/// Screen lifecycle primitives of the terminal surface.
pub trait Renderer {
    /// Draw the current surface.
    fn render(&mut self) -> Result<()>;
    /// Drop every placed widget, keeping the terminal session open.
    fn clear(&mut self);
    /// Release the terminal. Calling it again is a no-op.
    fn close(&mut self) -> Result<()>;
}
