//! Configuration values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single configuration value.
///
/// Values are opaque to the resolver; typed accessors on
/// [`crate::Config`] and [`crate::EffectiveConfig`] interpret them on demand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Free-form string.
    String(String),
    /// Ordered list of strings.
    List(Vec<String>),
}

impl ConfigValue {
    /// Returns the string payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Interprets the value as a boolean.
    ///
    /// Strings `"true"` and `"false"` are accepted case-insensitively.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::String(value) if value.eq_ignore_ascii_case("true") => Some(true),
            Self::String(value) if value.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }

    /// Interprets the value as an integer, parsing strings when needed.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::String(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    /// Interprets the value as a list.
    ///
    /// Strings are split on commas; blank entries are dropped.
    #[must_use]
    pub fn as_list(&self) -> Option<Vec<String>> {
        match self {
            Self::List(values) => Some(values.clone()),
            Self::String(value) => Some(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_owned)
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::String(value) => f.write_str(value),
            Self::List(values) => f.write_str(&values.join(",")),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interprets_string_booleans() {
        assert_eq!(ConfigValue::from("TRUE").as_bool(), Some(true));
        assert_eq!(ConfigValue::from("false").as_bool(), Some(false));
        assert_eq!(ConfigValue::from("yes").as_bool(), None);
        assert_eq!(ConfigValue::Int(1).as_bool(), None);
    }

    #[test]
    fn splits_comma_separated_lists() {
        let value = ConfigValue::from("TLSv1.2, TLSv1.3,,");
        assert_eq!(
            value.as_list(),
            Some(vec!["TLSv1.2".to_owned(), "TLSv1.3".to_owned()])
        );
    }

    #[test]
    fn deserializes_untagged_json() {
        let values: Vec<ConfigValue> =
            serde_json::from_str(r#"[true, 42, "text", ["a", "b"]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                ConfigValue::Bool(true),
                ConfigValue::Int(42),
                ConfigValue::from("text"),
                ConfigValue::List(vec!["a".to_owned(), "b".to_owned()]),
            ]
        );
    }
}
