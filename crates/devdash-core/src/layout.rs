//! Retained row/column layout.
//!
//! [`Layout`] is the in-memory drawing surface the façade writes into. A
//! refresh pass fills a fresh `Layout`; the UI then renders it. Rows keep
//! declaration order and are never reordered or reflowed; a row wider than
//! [`GRID_UNITS`] is the renderer's problem.

use crate::backend::Drawer;
use crate::color::Color;
use crate::size::GRID_UNITS;
use crate::style::{BarChartStyle, StackedBarChartStyle, TableStyle, TextBoxStyle, TitleStyle};
use crate::widget::{BarSeries, StackedSeries, Widget};

/// A column of widgets stacked top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub units: u16,
    pub widgets: Vec<Widget>,
}

impl Column {
    pub fn new(units: u16) -> Self {
        Self {
            units,
            widgets: Vec::new(),
        }
    }

    pub fn height(&self) -> u16 {
        self.widgets
            .iter()
            .fold(0u16, |acc, w| acc.saturating_add(w.height()))
    }
}

/// An ordered sequence of columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub columns: Vec<Column>,
}

impl Row {
    /// Height of the tallest column.
    pub fn height(&self) -> u16 {
        self.columns.iter().map(Column::height).max().unwrap_or(0)
    }

    /// Sum of column widths, in layout units.
    pub fn units(&self) -> u16 {
        self.columns
            .iter()
            .fold(0u16, |acc, c| acc.saturating_add(c.units))
    }
}

/// The full dashboard surface for one refresh pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    rows: Vec<Row>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every placed widget, in row/column/stack order.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.rows
            .iter()
            .flat_map(|r| r.columns.iter())
            .flat_map(|c| c.widgets.iter())
    }

    /// A full-width red panel reporting an error.
    pub fn error_panel(message: impl Into<String>) -> Self {
        Self::message_panel("Error", message, Color::Red)
    }

    /// A full-width panel showing a single message.
    pub fn message_panel(title: &str, message: impl Into<String>, color: Color) -> Self {
        let text: String = message.into();
        let lines = u16::try_from(text.lines().count()).unwrap_or(u16::MAX);
        let mut layout = Self::new();
        layout.add_row();
        layout.add_col(GRID_UNITS);
        layout.text_box(
            title.to_string(),
            text,
            TextBoxStyle {
                text_color: color,
                border_color: color,
                title_color: color,
                height: lines.saturating_add(2).max(3),
            },
        );
        layout
    }

    fn place(&mut self, widget: Widget) {
        if self.rows.is_empty() {
            self.add_row();
        }
        let needs_col = self.rows.last().is_some_and(|r| r.columns.is_empty());
        if needs_col {
            self.add_col(GRID_UNITS);
        }
        if let Some(col) = self
            .rows
            .last_mut()
            .and_then(|row| row.columns.last_mut())
        {
            col.widgets.push(widget);
        }
    }
}

impl Drawer for Layout {
    fn title(&mut self, text: String, style: TitleStyle) {
        self.add_row();
        self.add_col(style.size);
        self.place(Widget::Title { text, style });
    }

    fn text_box(&mut self, title: String, text: String, style: TextBoxStyle) {
        self.place(Widget::TextBox { title, text, style });
    }

    fn bar_chart(&mut self, title: String, data: BarSeries, style: BarChartStyle) {
        self.place(Widget::BarChart { title, data, style });
    }

    fn stacked_bar_chart(&mut self, title: String, data: StackedSeries, style: StackedBarChartStyle) {
        self.place(Widget::StackedBarChart { title, data, style });
    }

    fn table(&mut self, title: String, rows: Vec<Vec<String>>, style: TableStyle) {
        self.place(Widget::Table { title, rows, style });
    }

    fn add_col(&mut self, units: u16) {
        if self.rows.is_empty() {
            self.add_row();
        }
        if let Some(row) = self.rows.last_mut() {
            row.columns.push(Column::new(units));
        }
    }

    fn add_row(&mut self) {
        self.rows.push(Row::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_keep_declaration_order() {
        let mut layout = Layout::new();
        layout.add_row();
        layout.add_col(6);
        layout.add_row();
        layout.add_col(8);

        let widths: Vec<Vec<u16>> = layout
            .rows()
            .iter()
            .map(|r| r.columns.iter().map(|c| c.units).collect())
            .collect();
        assert_eq!(widths, vec![vec![6], vec![8]]);
    }

    #[test]
    fn test_widgets_land_in_last_column() {
        let mut layout = Layout::new();
        layout.add_row();
        layout.add_col(4);
        layout.add_col(8);
        layout.text_box("a".into(), "1".into(), TextBoxStyle::default());
        layout.text_box("b".into(), "2".into(), TextBoxStyle::default());

        let row = &layout.rows()[0];
        assert!(row.columns[0].widgets.is_empty());
        assert_eq!(row.columns[1].widgets.len(), 2);
        assert_eq!(row.height(), 6);
        assert_eq!(row.units(), 12);
    }

    #[test]
    fn test_widget_without_row_opens_full_width_column() {
        let mut layout = Layout::new();
        layout.table("t".into(), vec![], TableStyle::default());
        assert_eq!(layout.rows().len(), 1);
        assert_eq!(layout.rows()[0].columns[0].units, GRID_UNITS);
    }

    #[test]
    fn test_title_opens_its_own_row() {
        let mut layout = Layout::new();
        layout.add_row();
        layout.add_col(6);
        layout.title(
            "site".into(),
            TitleStyle {
                size: 10,
                ..TitleStyle::default()
            },
        );
        assert_eq!(layout.rows().len(), 2);
        assert_eq!(layout.rows()[1].columns[0].units, 10);
        assert_eq!(layout.widgets().count(), 1);
    }

    #[test]
    fn test_too_wide_rows_are_kept() {
        let mut layout = Layout::new();
        layout.add_row();
        layout.add_col(12);
        layout.add_col(12);
        assert_eq!(layout.rows()[0].units(), 24);
    }

    #[test]
    fn test_error_panel() {
        let layout = Layout::error_panel("invalid size 'huge'");
        assert_eq!(layout.rows().len(), 1);
        match layout.widgets().next() {
            Some(Widget::TextBox { title, text, style }) => {
                assert_eq!(title, "Error");
                assert!(text.contains("huge"));
                assert_eq!(style.border_color, Color::Red);
            }
            other => panic!("unexpected widget {other:?}"),
        };
    }
}
