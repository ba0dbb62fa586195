//! Renders a retained [`Layout`] onto a ratatui frame.
//!
//! Rows stack top to bottom at the height of their tallest column; columns
//! split each row as a fraction of the 12-unit grid; widgets stack inside a
//! column at their own height. Anything that does not fit is clipped.

use ratatui::{
    layout::{Alignment, Constraint, Layout as Split, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Cell, Paragraph, Row as TableRow, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use devdash_core::color::Color;
use devdash_core::layout::{Column, Layout, Row};
use devdash_core::size::GRID_UNITS;
use devdash_core::style::{BarChartStyle, StackedBarChartStyle, TableStyle, TextBoxStyle, TitleStyle};
use devdash_core::widget::{BarSeries, StackedSeries, Widget};

/// Terminal color for a dashboard color.
pub fn term_color(color: Color) -> ratatui::style::Color {
    use ratatui::style::Color as C;
    match color {
        Color::Default => C::Reset,
        Color::Black => C::Black,
        Color::Red => C::Red,
        Color::Green => C::Green,
        Color::Yellow => C::Yellow,
        Color::Blue => C::Blue,
        Color::Magenta => C::Magenta,
        Color::Cyan => C::Cyan,
        Color::White => C::White,
    }
}

fn fg(color: Color) -> Style {
    Style::default().fg(term_color(color))
}

fn bordered(title: &str, title_color: Color, border_color: Color) -> Block<'static> {
    let block = Block::bordered().border_style(fg(border_color));
    if title.is_empty() {
        block
    } else {
        block.title(Line::from(Span::styled(format!(" {title} "), fg(title_color))))
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

pub fn render_layout(frame: &mut Frame, area: Rect, layout: &Layout) {
    let mut constraints: Vec<Constraint> = layout
        .rows()
        .iter()
        .map(|r| Constraint::Length(r.height()))
        .collect();
    constraints.push(Constraint::Min(0));
    let areas = Split::vertical(constraints).split(area);

    for (row, row_area) in layout.rows().iter().zip(areas.iter()) {
        render_row(frame, *row_area, row);
    }
}

fn render_row(frame: &mut Frame, area: Rect, row: &Row) {
    let mut constraints: Vec<Constraint> = row
        .columns
        .iter()
        .map(|c| Constraint::Ratio(u32::from(c.units), u32::from(GRID_UNITS)))
        .collect();
    constraints.push(Constraint::Min(0));
    let areas = Split::horizontal(constraints).split(area);

    for (column, column_area) in row.columns.iter().zip(areas.iter()) {
        render_column(frame, *column_area, column);
    }
}

fn render_column(frame: &mut Frame, area: Rect, column: &Column) {
    let mut constraints: Vec<Constraint> = column
        .widgets
        .iter()
        .map(|w| Constraint::Length(w.height()))
        .collect();
    constraints.push(Constraint::Min(0));
    let areas = Split::vertical(constraints).split(area);

    for (widget, widget_area) in column.widgets.iter().zip(areas.iter()) {
        render_widget(frame, *widget_area, widget);
    }
}

pub fn render_widget(frame: &mut Frame, area: Rect, widget: &Widget) {
    if area.is_empty() {
        return;
    }
    match widget {
        Widget::Title { text, style } => render_title(frame, area, text, style),
        Widget::TextBox { title, text, style } => render_text_box(frame, area, title, text, style),
        Widget::BarChart { title, data, style } => render_bar_chart(frame, area, title, data, style),
        Widget::StackedBarChart { title, data, style } => {
            render_stacked_bar_chart(frame, area, title, data, style)
        }
        Widget::Table { title, rows, style } => render_table(frame, area, title, rows, style),
    }
}

// ── Widgets ───────────────────────────────────────────────────────────────────

fn render_title(frame: &mut Frame, area: Rect, text: &str, style: &TitleStyle) {
    let mut text_style = fg(style.text_color);
    if style.bold {
        text_style = text_style.add_modifier(Modifier::BOLD);
    }
    let paragraph = Paragraph::new(Line::from(Span::styled(text.to_string(), text_style)))
        .alignment(Alignment::Center)
        .block(Block::bordered().border_style(fg(style.border_color)));
    frame.render_widget(paragraph, area);
}

fn render_text_box(frame: &mut Frame, area: Rect, title: &str, text: &str, style: &TextBoxStyle) {
    let paragraph = Paragraph::new(text.to_string())
        .style(fg(style.text_color))
        .wrap(Wrap { trim: false })
        .block(bordered(title, style.title_color, style.border_color));
    frame.render_widget(paragraph, area);
}

fn render_bar_chart(frame: &mut Frame, area: Rect, title: &str, data: &BarSeries, style: &BarChartStyle) {
    let bars: Vec<Bar> = data
        .values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let label = data.labels.get(i).cloned().unwrap_or_default();
            let num_color = if *value == 0 {
                style.empty_num_color
            } else {
                style.num_color
            };
            Bar::default()
                .value(*value)
                .label(Line::from(label))
                .style(fg(style.bar_color))
                .value_style(fg(num_color).add_modifier(Modifier::REVERSED))
        })
        .collect();

    let chart = BarChart::default()
        .block(bordered(title, style.title_color, style.border_color))
        .data(BarGroup::default().bars(&bars))
        .bar_width(style.bar_width.max(1))
        .bar_gap(style.gap)
        .label_style(fg(style.text_color));
    frame.render_widget(chart, area);
}

/// Series are drawn side by side within one group per label.
fn render_stacked_bar_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    data: &StackedSeries,
    style: &StackedBarChartStyle,
) {
    let mut chart = BarChart::default()
        .block(bordered(title, style.title_color, style.border_color))
        .bar_width(style.bar_width.max(1))
        .bar_gap(style.gap)
        .group_gap(style.gap.saturating_add(1))
        .label_style(fg(style.text_color));

    for (i, label) in data.labels().iter().enumerate() {
        let bars: Vec<Bar> = data
            .column(i)
            .enumerate()
            .map(|(series, value)| {
                Bar::default()
                    .value(value)
                    .style(fg(data.color(series)))
                    .value_style(fg(style.num_color).bg(term_color(data.color(series))))
            })
            .collect();
        chart = chart.data(BarGroup::default().label(Line::from(label.clone())).bars(&bars));
    }
    frame.render_widget(chart, area);
}

/// The first row is the header.
fn render_table(frame: &mut Frame, area: Rect, title: &str, rows: &[Vec<String>], style: &TableStyle) {
    let widths: Vec<Constraint> = column_widths(rows).into_iter().map(Constraint::Length).collect();

    let to_row = |cells: &Vec<String>| TableRow::new(cells.iter().map(|c| Cell::from(c.clone())));
    let mut table = Table::new(rows.iter().skip(1).map(to_row), widths)
        .style(fg(style.text_color))
        .column_spacing(2)
        .block(bordered(title, style.title_color, style.border_color));
    if let Some(header) = rows.first() {
        table = table.header(to_row(header).style(fg(style.title_color).add_modifier(Modifier::BOLD)));
    }
    frame.render_widget(table, area);
}

/// Display width of the widest cell in each column.
pub fn column_widths(rows: &[Vec<String>]) -> Vec<u16> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..columns)
        .map(|i| {
            let widest = rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| UnicodeWidthStr::width(c.as_str()))
                .max()
                .unwrap_or(0);
            u16::try_from(widest).unwrap_or(u16::MAX)
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use devdash_core::backend::Drawer;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(layout: &Layout, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| render_layout(frame, frame.area(), layout))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(usize::from(width))
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sample_layout() -> Layout {
        let mut layout = Layout::new();
        layout.title("my site".into(), TitleStyle::default());
        layout.add_row();
        layout.add_col(6);
        layout.text_box("Availability".into(), "online".into(), TextBoxStyle::default());
        layout.add_col(6);
        layout.bar_chart(
            "Users".into(),
            BarSeries::new(vec![3, 0, 7], vec!["a".into(), "b".into(), "c".into()]),
            BarChartStyle::default(),
        );
        layout.add_row();
        layout.add_col(12);
        layout.table(
            "Queries".into(),
            vec![
                vec!["Query".into(), "Clicks".into()],
                vec!["rust tui".into(), "12".into()],
            ],
            TableStyle::default(),
        );
        layout
    }

    #[test]
    fn test_term_color_mapping() {
        assert_eq!(term_color(Color::Default), ratatui::style::Color::Reset);
        assert_eq!(term_color(Color::Blue), ratatui::style::Color::Blue);
    }

    #[test]
    fn test_column_widths_use_display_width() {
        let rows = vec![
            vec!["Query".to_string(), "Clicks".to_string()],
            vec!["日本語".to_string(), "3".to_string()],
        ];
        assert_eq!(column_widths(&rows), vec![6, 6]);
        assert!(column_widths(&[]).is_empty());
    }

    #[test]
    fn test_render_layout_shows_widgets() {
        let screen = draw(&sample_layout(), 80, 30);
        assert!(screen.contains("my site"));
        assert!(screen.contains("Availability"));
        assert!(screen.contains("online"));
        assert!(screen.contains("rust tui"));
    }

    #[test]
    fn test_render_stacked_chart_does_not_panic() {
        let mut layout = Layout::new();
        layout.stacked_bar_chart(
            "Issues".into(),
            StackedSeries::new(
                vec![vec![3, 1], vec![2, 5]],
                vec!["bug".into(), "docs".into()],
                vec![Color::Green, Color::Red],
            )
            .unwrap(),
            StackedBarChartStyle::default(),
        );
        draw(&layout, 60, 12);
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        draw(&sample_layout(), 10, 4);
        draw(&Layout::new(), 10, 4);
    }

    #[test]
    fn test_render_error_panel() {
        let screen = draw(&Layout::error_panel("invalid size 'huge'"), 60, 6);
        assert!(screen.contains("Error"));
        assert!(screen.contains("invalid size 'huge'"));
    }
}
