//! Color Mapper: named color tokens to backend color codes.

/// The fixed palette widgets can be styled with.
///
/// The discriminant is the backend color code; `Default` is the zero value
/// and means "use the terminal's own color".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum Color {
    #[default]
    Default = 0,
    Black = 1,
    Red = 2,
    Green = 3,
    Yellow = 4,
    Blue = 5,
    Magenta = 6,
    Cyan = 7,
    White = 8,
}

/// Token table shared by both lookup directions.
const COLOR_TABLE: [(&str, Color); 9] = [
    ("default", Color::Default),
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
];

impl Color {
    /// Map a color token to a color. Unknown tokens map to [`Color::Default`].
    pub fn resolve(token: &str) -> Color {
        COLOR_TABLE
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, color)| *color)
            .unwrap_or_default()
    }

    /// Map a backend code back to a color, if the code is in the palette.
    pub fn from_code(code: u16) -> Option<Color> {
        COLOR_TABLE
            .iter()
            .map(|(_, color)| *color)
            .find(|color| color.code() == code)
    }

    /// Backend color code.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Token naming this color. Diagnostic helper, not used when drawing.
    pub fn name(self) -> &'static str {
        COLOR_TABLE
            .iter()
            .find(|(_, color)| *color == self)
            .map(|(name, _)| *name)
            .unwrap_or("default")
    }

    /// Every color in palette order.
    pub fn all() -> impl Iterator<Item = Color> {
        COLOR_TABLE.iter().map(|(_, color)| *color)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
