//! Size Mapper: column size tokens to layout units.
//!
//! Columns are sized on a 12-unit grid. A token is either a t-shirt size
//! (`xxs` .. `xxl`, any case) or an integer literal. Unlike colors, a bad
//! size is always an error.

use crate::error::{DashError, Result};
use crate::options::parse_int;

/// Number of layout units spanning the full terminal width.
pub const GRID_UNITS: u16 = 12;

const SIZE_TABLE: [(&str, u16); 7] = [
    ("xxs", 1),
    ("xs", 2),
    ("s", 4),
    ("m", 6),
    ("l", 8),
    ("xl", 10),
    ("xxl", 12),
];

/// Resolve a size token into a layout unit count.
pub fn resolve(token: &str) -> Result<u16> {
    let lower = token.to_lowercase();
    if let Some((_, units)) = SIZE_TABLE.iter().find(|(name, _)| *name == lower) {
        return Ok(*units);
    }

    let value = parse_int(token).map_err(|source| DashError::SizeResolution {
        token: token.to_string(),
        source,
    })?;
    u16::try_from(value).map_err(|_| DashError::SizeOutOfRange(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tshirt_sizes_any_case() {
        let expected = [1, 2, 4, 6, 8, 10, 12];
        let words = ["xxs", "xs", "s", "m", "l", "xl", "xxl"];
        for (word, units) in words.iter().zip(expected) {
            assert_eq!(resolve(word).unwrap(), units);
            assert_eq!(resolve(&word.to_uppercase()).unwrap(), units);
        }
        assert_eq!(resolve("Xl").unwrap(), 10);
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(resolve("5").unwrap(), 5);
        assert_eq!(resolve("0xA").unwrap(), 10);
        assert_eq!(resolve("014").unwrap(), 12);
    }

    #[test]
    fn test_unparseable_token_errors() {
        for token in ["huge", "", "m ", "6u"] {
            match resolve(token) {
                Err(DashError::SizeResolution { token: t, .. }) => assert_eq!(t, token),
                other => panic!("expected SizeResolution for {token:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_negative_or_oversized_errors() {
        assert!(matches!(resolve("-1"), Err(DashError::SizeOutOfRange(_))));
        assert!(matches!(resolve("70000"), Err(DashError::SizeOutOfRange(_))));
    }
}
