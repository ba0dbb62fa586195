//! Widget payloads and the retained widget record.

use crate::color::Color;
use crate::error::{DashError, Result};
use crate::style::{BarChartStyle, StackedBarChartStyle, TableStyle, TextBoxStyle, TitleStyle};

/// Maximum number of series a stacked bar chart can draw.
pub const MAX_STACKED_SERIES: usize = 8;

/// One numeric series with a label per bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BarSeries {
    pub values: Vec<u64>,
    pub labels: Vec<String>,
}

impl BarSeries {
    pub fn new(values: Vec<u64>, labels: Vec<String>) -> Self {
        Self { values, labels }
    }
}

/// Up to [`MAX_STACKED_SERIES`] parallel series sharing one set of labels.
///
/// `series[i][j]` is the value of series `i` at label `j`; `colors[i]` is
/// the fill for series `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackedSeries {
    series: Vec<Vec<u64>>,
    labels: Vec<String>,
    colors: Vec<Color>,
}

impl StackedSeries {
    pub fn new(series: Vec<Vec<u64>>, labels: Vec<String>, colors: Vec<Color>) -> Result<Self> {
        if series.len() > MAX_STACKED_SERIES {
            return Err(DashError::TooManySeries(series.len()));
        }
        Ok(Self {
            series,
            labels,
            colors,
        })
    }

    pub fn series(&self) -> &[Vec<u64>] {
        &self.series
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Color for series `index`; series without a configured color use the default.
    pub fn color(&self, index: usize) -> Color {
        self.colors.get(index).copied().unwrap_or_default()
    }

    /// Values of every series at label `index`, in series order.
    pub fn column(&self, index: usize) -> impl Iterator<Item = u64> + '_ {
        self.series
            .iter()
            .map(move |s| s.get(index).copied().unwrap_or(0))
    }
}

/// A widget as retained by the layout, with its fully resolved style.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Title {
        text: String,
        style: TitleStyle,
    },
    TextBox {
        title: String,
        text: String,
        style: TextBoxStyle,
    },
    BarChart {
        title: String,
        data: BarSeries,
        style: BarChartStyle,
    },
    StackedBarChart {
        title: String,
        data: StackedSeries,
        style: StackedBarChartStyle,
    },
    Table {
        title: String,
        rows: Vec<Vec<String>>,
        style: TableStyle,
    },
}

impl Widget {
    /// Rows of terminal height this widget asks for.
    pub fn height(&self) -> u16 {
        match self {
            Widget::Title { style, .. } => style.height,
            Widget::TextBox { style, .. } => style.height,
            Widget::BarChart { style, .. } => style.height,
            Widget::StackedBarChart { style, .. } => style.height,
            // Borders take one row each.
            Widget::Table { rows, style, .. } => style
                .height
                .unwrap_or_else(|| u16::try_from(rows.len()).unwrap_or(u16::MAX).saturating_add(2)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Widget::Title { .. } => "title",
            Widget::TextBox { .. } => "text_box",
            Widget::BarChart { .. } => "bar_chart",
            Widget::StackedBarChart { .. } => "stacked_bar_chart",
            Widget::Table { .. } => "table",
        }
    }
}
