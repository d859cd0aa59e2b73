//! Immutable configuration snapshots and prefix-override resolution.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use tracing::{trace, warn};

use crate::keys::{RESERVED_PREFIXES, is_sensitive, mask_url_credentials};
use crate::{ConfigError, ConfigResult, ConfigValue};

const MASK: &str = "[hidden]";

/// Process-wide configuration snapshot.
///
/// The snapshot is never mutated after construction. Loaders produce new
/// snapshots through [`Config::merged`].
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    values: BTreeMap<String, ConfigValue>,
    reserved_prefixes: Vec<String>,
}

impl Config {
    /// Creates a snapshot from the supplied values using [`RESERVED_PREFIXES`].
    #[must_use]
    pub fn new(values: BTreeMap<String, ConfigValue>) -> Self {
        Self {
            values,
            reserved_prefixes: RESERVED_PREFIXES.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    /// Creates an empty snapshot.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(BTreeMap::new())
    }

    /// Replaces the set of subsystem prefixes excluded from ambient resolution.
    #[must_use]
    pub fn with_reserved_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Returns a new snapshot in which `overrides` replace existing values.
    #[must_use]
    pub fn merged<I>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, ConfigValue)>,
    {
        let mut values = self.values.clone();
        values.extend(overrides);
        Self {
            values,
            reserved_prefixes: self.reserved_prefixes.clone(),
        }
    }

    /// Returns the subsystem prefixes excluded from ambient resolution.
    #[must_use]
    pub fn reserved_prefixes(&self) -> &[String] {
        &self.reserved_prefixes
    }

    /// Derives the effective configuration for the subsystem under `prefix`.
    ///
    /// Ambient keys (those outside every reserved namespace) are copied
    /// unchanged. Keys under `prefix` are then stripped and inserted,
    /// overwriting ambient keys of the same name. Keys under any other
    /// reserved namespace are dropped, as is a key equal to `prefix` itself.
    #[must_use]
    pub fn values_with_prefix_override(&self, prefix: &str) -> EffectiveConfig {
        let mut resolved: BTreeMap<String, ConfigValue> = self
            .values
            .iter()
            .filter(|(key, _)| !key.starts_with(prefix) && !self.is_reserved(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let ambient = resolved.len();

        for (key, value) in &self.values {
            match key.strip_prefix(prefix) {
                Some("") => warn!(key = %key, "ignoring configuration key with no name after prefix"),
                Some(stripped) => {
                    resolved.insert(stripped.to_owned(), value.clone());
                }
                None => {}
            }
        }

        trace!(
            prefix,
            ambient,
            resolved = resolved.len(),
            "resolved configuration with prefix override"
        );
        EffectiveConfig { values: resolved }
    }

    fn is_reserved(&self, key: &str) -> bool {
        self.reserved_prefixes
            .iter()
            .any(|prefix| key.starts_with(prefix.as_str()))
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Returns the string stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value is not a string.
    pub fn get_str(&self, key: &str) -> ConfigResult<Option<&str>> {
        lookup_str(&self.values, key)
    }

    /// Returns the boolean stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value is not a boolean.
    pub fn get_bool(&self, key: &str) -> ConfigResult<Option<bool>> {
        lookup_bool(&self.values, key)
    }

    /// Returns the integer stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value is not an integer.
    pub fn get_int(&self, key: &str) -> ConfigResult<Option<i64>> {
        lookup_int(&self.values, key)
    }

    /// Returns the list stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value is not a list.
    pub fn get_list(&self, key: &str) -> ConfigResult<Option<Vec<String>>> {
        lookup_list(&self.values, key)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of keys in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the snapshot holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ConfigValue> {
        self.values.iter()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Config
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("values", &Masked(&self.values))
            .field("reserved_prefixes", &self.reserved_prefixes)
            .finish()
    }
}

/// Configuration resolved for a single subsystem.
///
/// Produced fresh by [`Config::values_with_prefix_override`] and never
/// modified afterwards.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EffectiveConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl EffectiveConfig {
    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Returns the string stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value is not a string.
    pub fn get_str(&self, key: &str) -> ConfigResult<Option<&str>> {
        lookup_str(&self.values, key)
    }

    /// Returns the boolean stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value is not a boolean.
    pub fn get_bool(&self, key: &str) -> ConfigResult<Option<bool>> {
        lookup_bool(&self.values, key)
    }

    /// Returns the integer stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value is not an integer.
    pub fn get_int(&self, key: &str) -> ConfigResult<Option<i64>> {
        lookup_int(&self.values, key)
    }

    /// Returns the list stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the value is not a list.
    pub fn get_list(&self, key: &str) -> ConfigResult<Option<Vec<String>>> {
        lookup_list(&self.values, key)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the number of resolved keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over resolved entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ConfigValue> {
        self.values.iter()
    }

    /// Iterates over resolved keys in order.
    pub fn keys(&self) -> btree_map::Keys<'_, String, ConfigValue> {
        self.values.keys()
    }

    /// Returns a printable view with secret values masked.
    #[must_use]
    pub fn redacted(&self) -> BTreeMap<&str, String> {
        self.values
            .iter()
            .map(|(key, value)| {
                let shown = if is_sensitive(key) {
                    MASK.to_owned()
                } else {
                    mask_url_credentials(&value.to_string(), MASK)
                };
                (key.as_str(), shown)
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for EffectiveConfig
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EffectiveConfig")
            .field(&Masked(&self.values))
            .finish()
    }
}

struct Masked<'a>(&'a BTreeMap<String, ConfigValue>);

impl fmt::Debug for Masked<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, value) in self.0 {
            match value {
                _ if is_sensitive(key) => map.entry(key, &MASK),
                ConfigValue::String(text) => {
                    map.entry(key, &ConfigValue::String(mask_url_credentials(text, MASK)))
                }
                _ => map.entry(key, value),
            };
        }
        map.finish()
    }
}

fn lookup_str<'a>(
    values: &'a BTreeMap<String, ConfigValue>,
    key: &str,
) -> ConfigResult<Option<&'a str>> {
    values
        .get(key)
        .map(|value| {
            value
                .as_str()
                .ok_or_else(|| ConfigError::invalid_value(key, "string"))
        })
        .transpose()
}

fn lookup_bool(values: &BTreeMap<String, ConfigValue>, key: &str) -> ConfigResult<Option<bool>> {
    values
        .get(key)
        .map(|value| {
            value
                .as_bool()
                .ok_or_else(|| ConfigError::invalid_value(key, "boolean"))
        })
        .transpose()
}

fn lookup_int(values: &BTreeMap<String, ConfigValue>, key: &str) -> ConfigResult<Option<i64>> {
    values
        .get(key)
        .map(|value| {
            value
                .as_int()
                .ok_or_else(|| ConfigError::invalid_value(key, "integer"))
        })
        .transpose()
}

fn lookup_list(
    values: &BTreeMap<String, ConfigValue>,
    key: &str,
) -> ConfigResult<Option<Vec<String>>> {
    values
        .get(key)
        .map(|value| {
            value
                .as_list()
                .ok_or_else(|| ConfigError::invalid_value(key, "list"))
        })
        .transpose()
}
