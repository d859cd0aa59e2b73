//! Configuration loader implementations.
//!
//! Loaders only build [`Config`] snapshots; precedence between layers is the
//! caller's choice, expressed through [`Config::merged`].

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::{Config, ConfigError, ConfigResult, ConfigValue};

/// Environment variable prefix mapped onto the `ksql.` namespace.
pub const DEFAULT_ENV_PREFIX: &str = "KSQL_";

/// Parses a Java-style properties document.
///
/// Each non-blank line that does not start with `#` or `!` must contain a
/// `key=value` or `key:value` pair. Keys and values are trimmed; every value
/// is loaded as a string.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for lines without a separator or with an
/// empty key.
pub fn parse_properties(input: &str) -> ConfigResult<Config> {
    let mut values = BTreeMap::new();

    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let Some(split) = line.find(['=', ':']) else {
            return Err(ConfigError::Parse {
                line: index + 1,
                reason: "expected `key=value`".into(),
            });
        };
        let key = line[..split].trim();
        if key.is_empty() {
            return Err(ConfigError::Parse {
                line: index + 1,
                reason: "key cannot be empty".into(),
            });
        }
        let value = line[split + 1..].trim();
        values.insert(key.to_owned(), ConfigValue::from(value));
    }

    Ok(Config::new(values))
}

/// Loads a properties file from disk.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read and
/// [`ConfigError::Parse`] if its contents are malformed.
pub fn from_properties_file(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_properties(&contents)?;
    debug!(path = %path.display(), keys = config.len(), "loaded properties file");
    Ok(config)
}

/// Decodes a JSON object into a configuration snapshot.
///
/// # Errors
///
/// Returns [`ConfigError::Json`] when the document is not an object of
/// supported values.
pub fn from_json_str(input: &str) -> ConfigResult<Config> {
    let values: BTreeMap<String, ConfigValue> = serde_json::from_str(input)?;
    Ok(Config::new(values))
}

/// Maps environment variables onto configuration keys.
///
/// Variables starting with `env_prefix` are renamed by stripping the prefix,
/// lowercasing, replacing `_` with `.` and prepending `ksql.`, so
/// `KSQL_SCHEMA_REGISTRY_URL` becomes `ksql.schema.registry.url`. Other
/// variables are ignored.
#[must_use]
pub fn env_overrides<I>(vars: I, env_prefix: &str) -> Vec<(String, ConfigValue)>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| {
            let rest = name.strip_prefix(env_prefix)?;
            if rest.is_empty() {
                return None;
            }
            let key = format!("ksql.{}", rest.to_ascii_lowercase().replace('_', "."));
            Some((key, ConfigValue::from(value)))
        })
        .collect()
}

/// Collects overrides from the process environment.
///
/// Variables whose name or value is not valid Unicode are skipped.
#[must_use]
pub fn from_env(env_prefix: &str) -> Vec<(String, ConfigValue)> {
    env_overrides(unicode_vars(std::env::vars_os()), env_prefix)
}

fn unicode_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter().filter_map(|(name, value)| {
        match (name.into_string(), value.into_string()) {
            (Ok(name), Ok(value)) => Some((name, value)),
            (Ok(name), Err(_)) => {
                debug!(variable = %name, "skipping environment variable with non-unicode value");
                None
            }
            (Err(_), _) => None,
        }
    })
}
