//! Namespaced item keys.
//!
//! Item kinds are identified by stable string keys (e.g. `mdm:iron_ingot`).
//! Keys are ordered and validated so they persist and iterate deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default namespace used when a key omits an explicit namespace.
pub const DEFAULT_NAMESPACE: &str = "mdm";

/// Path of the empty item kind (`mdm:air`).
pub const AIR_PATH: &str = "air";

/// Error returned when parsing an invalid [`ItemKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemKeyError {
    /// Input was empty or whitespace.
    #[error("item key cannot be empty")]
    Empty,
    /// Namespace segment failed validation.
    #[error("invalid item key namespace `{0}` (allowed: a-z0-9_.-, max 64)")]
    Namespace(String),
    /// Path segment failed validation.
    #[error("invalid item key path `{0}` (allowed: a-z0-9_./-, max 128)")]
    Path(String),
}

/// A namespaced item kind of the form `namespace:path`.
///
/// Ordering is lexical by `(namespace, path)` and is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemKey {
    namespace: String,
    path: String,
}

impl ItemKey {
    /// Parse an item key.
    ///
    /// Accepts either `namespace:path` or a bare `path` (uses [`DEFAULT_NAMESPACE`]).
    pub fn parse(input: &str) -> Result<Self, ItemKeyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ItemKeyError::Empty);
        }

        let (namespace, path) = input.split_once(':').unwrap_or((DEFAULT_NAMESPACE, input));
        let namespace = namespace.trim();
        let path = path.trim();

        if !valid_segment(namespace, 64, false) {
            return Err(ItemKeyError::Namespace(namespace.to_string()));
        }
        if !valid_segment(path, 128, true) {
            return Err(ItemKeyError::Path(path.to_string()));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Key namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The empty item kind, `mdm:air`.
    pub fn air() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            path: AIR_PATH.to_string(),
        }
    }

    /// True for `mdm:air`, which stands for "nothing" wherever it appears.
    pub fn is_air(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE && self.path == AIR_PATH
    }
}

fn valid_segment(segment: &str, max_len: usize, allow_slash: bool) -> bool {
    !segment.is_empty()
        && segment.len() <= max_len
        && segment.chars().all(|c| {
            matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.') || (allow_slash && c == '/')
        })
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for ItemKey {
    type Err = ItemKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemKey {
    type Error = ItemKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemKey> for String {
    fn from(key: ItemKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_namespaced_key() {
        let key = ItemKey::parse("mdm:netherite_ingot").unwrap();
        assert_eq!(key.namespace(), "mdm");
        assert_eq!(key.path(), "netherite_ingot");
        assert_eq!(key.to_string(), "mdm:netherite_ingot");
    }

    #[test]
    fn parses_with_default_namespace() {
        let key = ItemKey::parse("diamond_sword").unwrap();
        assert_eq!(key.to_string(), "mdm:diamond_sword");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(ItemKey::parse(""), Err(ItemKeyError::Empty));
        assert_eq!(ItemKey::parse("   "), Err(ItemKeyError::Empty));
    }

    #[test]
    fn rejects_invalid_chars() {
        assert!(ItemKey::parse("mdm:Diamond").is_err());
        assert!(ItemKey::parse("MDM:diamond").is_err());
        assert!(ItemKey::parse("mdm:diamond?").is_err());
        assert!(ItemKey::parse("mdm:").is_err());
        assert!(ItemKey::parse(":diamond").is_err());
    }

    #[test]
    fn string_conversion_round_trips() {
        let key = ItemKey::parse("trims/coast_armor_trim").unwrap();
        let text = String::from(key.clone());
        assert_eq!(text, "mdm:trims/coast_armor_trim");
        assert_eq!(ItemKey::try_from(text).unwrap(), key);
    }

    #[test]
    fn air_is_the_default_namespace_air() {
        assert!(ItemKey::parse("air").unwrap().is_air());
        assert_eq!(ItemKey::air().to_string(), "mdm:air");
        assert!(!ItemKey::parse("other:air").unwrap().is_air());
    }
}
