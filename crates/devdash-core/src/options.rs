//! Option Resolver.
//!
//! Widgets are styled from a loosely-typed [`OptionMap`] written by hand in
//! the configuration file. The helpers here turn single entries into typed
//! values, falling back to a caller-supplied default when the key is absent.
//!
//! Leniency differs per type: colors and integers never fail (unknown colors
//! become [`Color::Default`], unparseable integers become `0`), while booleans
//! raise [`DashError::ConfigValidation`] because they control emphasis.

use std::collections::BTreeMap;
use std::num::ParseIntError;

use serde::{Deserialize, Deserializer};

use crate::color::Color;
use crate::error::{DashError, Result};

pub const OPTION_SIZE: &str = "size";
pub const OPTION_TITLE: &str = "title";
pub const OPTION_TITLE_COLOR: &str = "title_color";
pub const OPTION_BORDER_COLOR: &str = "border_color";
pub const OPTION_TEXT_COLOR: &str = "text_color";
pub const OPTION_NUM_COLOR: &str = "num_color";
pub const OPTION_EMPTY_NUM_COLOR: &str = "empty_num_color";
pub const OPTION_BOLD: &str = "bold";
pub const OPTION_FIRST_COLOR: &str = "first_color";
pub const OPTION_SECOND_COLOR: &str = "second_color";
pub const OPTION_HEIGHT: &str = "height";
pub const OPTION_BAR_GAP: &str = "bar_gap";
pub const OPTION_BAR_WIDTH: &str = "bar_width";
pub const OPTION_BAR_COLOR: &str = "bar_color";
pub const OPTION_LIMIT: &str = "limit";

// ── OptionMap ─────────────────────────────────────────────────────────────────

/// String-keyed styling overrides for one widget.
///
/// Keys are case-sensitive and unknown keys are ignored. In YAML the values
/// may be written as strings, numbers or booleans; they are stored as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap(BTreeMap<String, String>);

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A copy of `self` with every entry of `overrides` written over it.
    pub fn overlay(&self, overrides: &OptionMap) -> OptionMap {
        let mut merged = self.clone();
        merged
            .0
            .extend(overrides.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Resolve a color option; unknown names give [`Color::Default`].
    pub fn color(&self, key: &str, default: Color) -> Color {
        match self.get(key) {
            Some(token) => Color::resolve(token),
            None => default,
        }
    }

    /// Resolve an integer option.
    ///
    /// A present value that does not parse, or does not fit `T`, yields zero
    /// rather than the default.
    pub fn int<T>(&self, key: &str, default: T) -> T
    where
        T: TryFrom<i64> + Default,
    {
        match self.get(key) {
            Some(raw) => parse_int(raw)
                .ok()
                .and_then(|v| T::try_from(v).ok())
                .unwrap_or_default(),
            None => default,
        }
    }

    /// Resolve a boolean option, failing on anything that is not a boolean.
    pub fn bool(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key) {
            Some(raw) => parse_bool(raw).ok_or_else(|| DashError::ConfigValidation {
                key: key.to_string(),
                value: raw.to_string(),
            }),
            None => Ok(default),
        }
    }

    /// Resolve a free-text option such as a widget title.
    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }
}

impl<K, V> FromIterator<(K, V)> for OptionMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Text form of a YAML option value.
///
/// Nulls and nested collections carry no usable setting and are dropped, so
/// the resolver falls back to the widget default for that key.
fn scalar_text(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Tagged(tagged) => scalar_text(tagged.value),
        serde_yaml::Value::Null | serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => None,
    }
}

impl<'de> Deserialize<'de> for OptionMap {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<BTreeMap<String, serde_yaml::Value>> = Option::deserialize(deserializer)?;
        Ok(Self(
            raw.unwrap_or_default()
                .into_iter()
                .filter_map(|(k, v)| scalar_text(v).map(|text| (k, text)))
                .collect(),
        ))
    }
}

// ── Scalar parsing ────────────────────────────────────────────────────────────

/// Parse an integer written in base 10 or with a radix prefix.
///
/// Accepts an optional sign followed by `0x`/`0X` (hex), `0o`/`0O` (octal),
/// `0b`/`0B` (binary), a bare leading `0` (octal) or plain decimal digits.
pub fn parse_int(raw: &str) -> std::result::Result<i64, ParseIntError> {
    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let (radix, digits) = if let Some(rest) = strip_prefix_ci(unsigned, "0x") {
        (16, rest)
    } else if let Some(rest) = strip_prefix_ci(unsigned, "0o") {
        (8, rest)
    } else if let Some(rest) = strip_prefix_ci(unsigned, "0b") {
        (2, rest)
    } else if unsigned.len() > 1 && unsigned.starts_with('0') {
        (8, &unsigned[1..])
    } else {
        (10, unsigned)
    };

    // Signs were consumed above; a second one is malformed.
    if digits.starts_with(['+', '-']) {
        return "".parse::<i64>();
    }

    // The sign goes back on before parsing so that i64::MIN is reachable.
    if negative {
        i64::from_str_radix(&format!("-{digits}"), radix)
    } else {
        i64::from_str_radix(digits, radix)
    }
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Parse the boolean spellings accepted in configuration files.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
