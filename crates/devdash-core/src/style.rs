//! Resolved Styles.
//!
//! One fully-typed bundle per widget kind. `Default` carries the kind's
//! tabulated defaults, so an empty [`OptionMap`] always resolves to a usable
//! style and the backend never sees a raw option string.

use crate::color::Color;
use crate::error::Result;
use crate::options::*;
use crate::size;

/// Styling for a project title banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleStyle {
    pub text_color: Color,
    pub border_color: Color,
    pub bold: bool,
    pub height: u16,
    /// Column width in layout units.
    pub size: u16,
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            text_color: Color::Default,
            border_color: Color::Default,
            bold: true,
            height: 3,
            size: size::GRID_UNITS,
        }
    }
}

impl TitleStyle {
    /// Default size token when `size` is not configured.
    pub const DEFAULT_SIZE: &'static str = "XXL";

    pub fn resolve(options: &OptionMap) -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            text_color: options.color(OPTION_TEXT_COLOR, d.text_color),
            border_color: options.color(OPTION_BORDER_COLOR, d.border_color),
            bold: options.bool(OPTION_BOLD, d.bold)?,
            height: options.int(OPTION_HEIGHT, d.height),
            size: size::resolve(options.text(OPTION_SIZE, Self::DEFAULT_SIZE))?,
        })
    }
}

/// Styling for a free-text box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBoxStyle {
    pub text_color: Color,
    pub border_color: Color,
    pub title_color: Color,
    pub height: u16,
}

impl Default for TextBoxStyle {
    fn default() -> Self {
        Self {
            text_color: Color::Default,
            border_color: Color::Default,
            title_color: Color::Default,
            height: 3,
        }
    }
}

impl TextBoxStyle {
    pub fn resolve(options: &OptionMap) -> Self {
        let d = Self::default();
        Self {
            text_color: options.color(OPTION_TEXT_COLOR, d.text_color),
            border_color: options.color(OPTION_BORDER_COLOR, d.border_color),
            title_color: options.color(OPTION_TITLE_COLOR, d.title_color),
            height: options.int(OPTION_HEIGHT, d.height),
        }
    }
}

/// Styling for a single-series bar chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarChartStyle {
    pub title_color: Color,
    pub border_color: Color,
    pub text_color: Color,
    pub num_color: Color,
    pub empty_num_color: Color,
    pub bar_color: Color,
    pub height: u16,
    pub gap: u16,
    pub bar_width: u16,
}

impl Default for BarChartStyle {
    fn default() -> Self {
        Self {
            title_color: Color::Default,
            border_color: Color::Default,
            text_color: Color::Default,
            num_color: Color::Default,
            empty_num_color: Color::Default,
            bar_color: Color::Default,
            height: 10,
            gap: 0,
            bar_width: 6,
        }
    }
}

impl BarChartStyle {
    pub fn resolve(options: &OptionMap) -> Self {
        let d = Self::default();
        Self {
            title_color: options.color(OPTION_TITLE_COLOR, d.title_color),
            border_color: options.color(OPTION_BORDER_COLOR, d.border_color),
            text_color: options.color(OPTION_TEXT_COLOR, d.text_color),
            num_color: options.color(OPTION_NUM_COLOR, d.num_color),
            empty_num_color: options.color(OPTION_EMPTY_NUM_COLOR, d.empty_num_color),
            bar_color: options.color(OPTION_BAR_COLOR, d.bar_color),
            height: options.int(OPTION_HEIGHT, d.height),
            gap: options.int(OPTION_BAR_GAP, d.gap),
            bar_width: options.int(OPTION_BAR_WIDTH, d.bar_width),
        }
    }
}

/// Styling for a stacked (multi-series) bar chart.
///
/// Series colors travel with the payload, not the style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackedBarChartStyle {
    pub title_color: Color,
    pub border_color: Color,
    pub text_color: Color,
    pub num_color: Color,
    pub height: u16,
    pub gap: u16,
    pub bar_width: u16,
}

impl Default for StackedBarChartStyle {
    fn default() -> Self {
        Self {
            title_color: Color::Default,
            border_color: Color::Blue,
            text_color: Color::Default,
            num_color: Color::Black,
            height: 10,
            gap: 0,
            bar_width: 6,
        }
    }
}

impl StackedBarChartStyle {
    pub fn resolve(options: &OptionMap) -> Self {
        let d = Self::default();
        Self {
            title_color: options.color(OPTION_TITLE_COLOR, d.title_color),
            border_color: options.color(OPTION_BORDER_COLOR, d.border_color),
            text_color: options.color(OPTION_TEXT_COLOR, d.text_color),
            num_color: options.color(OPTION_NUM_COLOR, d.num_color),
            height: options.int(OPTION_HEIGHT, d.height),
            gap: options.int(OPTION_BAR_GAP, d.gap),
            bar_width: options.int(OPTION_BAR_WIDTH, d.bar_width),
        }
    }
}

/// Styling for a string grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableStyle {
    pub title_color: Color,
    pub border_color: Color,
    pub text_color: Color,
    /// Explicit height; `None` sizes the table to its rows.
    pub height: Option<u16>,
}

impl TableStyle {
    pub fn resolve(options: &OptionMap) -> Self {
        let d = Self::default();
        Self {
            title_color: options.color(OPTION_TITLE_COLOR, d.title_color),
            border_color: options.color(OPTION_BORDER_COLOR, d.border_color),
            text_color: options.color(OPTION_TEXT_COLOR, d.text_color),
            height: options
                .get(OPTION_HEIGHT)
                .map(|_| options.int(OPTION_HEIGHT, 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashError;

    fn opts(pairs: &[(&str, &str)]) -> OptionMap {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_empty_options_yield_tabulated_defaults() {
        let empty = OptionMap::new();

        let title = TitleStyle::resolve(&empty).unwrap();
        assert_eq!(title.size, 12);
        assert!(title.bold);
        assert_eq!(title.height, 3);
        assert_eq!(title, TitleStyle::default());

        let bar = BarChartStyle::resolve(&empty);
        assert_eq!((bar.height, bar.gap, bar.bar_width), (10, 0, 6));
        assert_eq!(bar, BarChartStyle::default());

        let stacked = StackedBarChartStyle::resolve(&empty);
        assert_eq!(stacked.border_color, Color::Blue);
        assert_eq!(stacked.num_color, Color::Black);
        assert_eq!(stacked, StackedBarChartStyle::default());

        assert_eq!(TextBoxStyle::resolve(&empty), TextBoxStyle::default());
        assert_eq!(TextBoxStyle::default().height, 3);
        assert_eq!(TableStyle::resolve(&empty), TableStyle::default());
    }

    #[test]
    fn test_title_overrides() {
        let style = TitleStyle::resolve(&opts(&[
            ("size", "m"),
            ("bold", "false"),
            ("height", "5"),
            ("border_color", "green"),
        ]))
        .unwrap();
        assert_eq!(style.size, 6);
        assert!(!style.bold);
        assert_eq!(style.height, 5);
        assert_eq!(style.border_color, Color::Green);
    }

    #[test]
    fn test_title_bad_bool_fails() {
        let err = TitleStyle::resolve(&opts(&[("bold", "notabool")])).unwrap_err();
        assert!(matches!(err, DashError::ConfigValidation { .. }));
    }

    #[test]
    fn test_title_bad_size_fails() {
        let err = TitleStyle::resolve(&opts(&[("size", "giant")])).unwrap_err();
        assert!(matches!(err, DashError::SizeResolution { .. }));
    }

    #[test]
    fn test_bad_height_is_zero() {
        let style = BarChartStyle::resolve(&opts(&[("height", "notanint")]));
        assert_eq!(style.height, 0);
        let title = TitleStyle::resolve(&opts(&[("height", "notanint")])).unwrap();
        assert_eq!(title.height, 0);
    }

    #[test]
    fn test_stacked_border_can_be_reset() {
        let style = StackedBarChartStyle::resolve(&opts(&[("border_color", "nope")]));
        assert_eq!(style.border_color, Color::Default);
    }

    #[test]
    fn test_table_height_only_when_configured() {
        let style = TableStyle::resolve(&opts(&[("height", "8")]));
        assert_eq!(style.height, Some(8));
        let style = TableStyle::resolve(&opts(&[("height", "x")]));
        assert_eq!(style.height, Some(0));
    }
}
