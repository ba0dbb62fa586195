//! Quit key configuration.

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use devdash_core::error::DashError;

/// A key that ends the session, written as `q`, `C-q` or `Esc` in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitKey {
    Char(char),
    Ctrl(char),
    Esc,
}

impl QuitKey {
    pub fn matches(&self, key: &KeyEvent) -> bool {
        match *self {
            QuitKey::Esc => key.code == KeyCode::Esc,
            QuitKey::Ctrl(c) => {
                key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char(k) if k.eq_ignore_ascii_case(&c))
            }
            QuitKey::Char(c) => {
                !key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
            }
        }
    }
}

/// Ctrl+C quits whatever the configured key is.
pub fn is_interrupt(key: &KeyEvent) -> bool {
    QuitKey::Ctrl('c').matches(key)
}

impl FromStr for QuitKey {
    type Err = DashError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || DashError::ConfigValidation {
            key: "keys.quit".to_string(),
            value: raw.to_string(),
        };
        if raw.eq_ignore_ascii_case("esc") {
            return Ok(QuitKey::Esc);
        }
        let (ctrl, rest) = match raw.strip_prefix("C-") {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let mut chars = rest.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if ctrl => Ok(QuitKey::Ctrl(c.to_ascii_lowercase())),
            (Some(c), None) => Ok(QuitKey::Char(c)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for QuitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuitKey::Char(c) => write!(f, "{c}"),
            QuitKey::Ctrl(c) => write!(f, "C-{c}"),
            QuitKey::Esc => f.write_str("Esc"),
        }
    }
}
