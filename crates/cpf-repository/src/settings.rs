//! Layered plugin settings read through content accesses
//!
//! Settings files are flat TOML documents. Nested tables are flattened into
//! dotted keys, so `[cache]\nenabled = true` is read as `cache.enabled`.
//! Layers are applied in order; later layers override earlier ones.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::access::ReadAccess;

/// Conventional settings file name.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Merged key/value settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    values: BTreeMap<String, toml::Value>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge every `(location, file_name)` layer in order.
    ///
    /// Missing or malformed layers are skipped; loading never fails.
    pub fn load(layers: &[(&dyn ReadAccess, &str)]) -> Self {
        let mut settings = Self::new();
        for (location, file_name) in layers {
            settings.load_layer(*location, file_name);
        }
        settings
    }

    /// Merge one layer. Returns whether it was found and applied.
    pub fn load_layer(&mut self, location: &dyn ReadAccess, file_name: &str) -> bool {
        if !location.exists(file_name) {
            tracing::debug!(file = file_name, "No settings layer");
            return false;
        }
        let Some(content) = location.read_text(file_name) else {
            tracing::error!(file = file_name, "Failed to read settings");
            return false;
        };
        match self.merge_str(&content) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(file = file_name, error = %e, "Failed to parse settings");
                false
            }
        }
    }

    /// Merge settings from TOML text.
    pub fn merge_str(&mut self, content: &str) -> Result<(), toml::de::Error> {
        let table: toml::Table = toml::from_str(content)?;
        flatten("", table, &mut self.values);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// The value as text; `None` when absent or not a scalar.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            toml::Value::String(s) => Some(s.clone()),
            toml::Value::Integer(i) => Some(i.to_string()),
            toml::Value::Float(f) => Some(f.to_string()),
            toml::Value::Boolean(b) => Some(b.to_string()),
            toml::Value::Datetime(d) => Some(d.to_string()),
            toml::Value::Array(_) | toml::Value::Table(_) => None,
        }
    }

    /// Non-empty values other than `true` (any case) read as `false`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.non_empty(key) {
            Some(value) => value.eq_ignore_ascii_case("true"),
            None => default,
        }
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.parsed(key, "int").unwrap_or(default)
    }

    pub fn get_long(&self, key: &str, default: i64) -> i64 {
        self.parsed(key, "long").unwrap_or(default)
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        self.get_str(key).filter(|v| !v.trim().is_empty())
    }

    fn parsed<T: FromStr>(&self, key: &str, kind: &str) -> Option<T> {
        let value = self.non_empty(key)?;
        match value.trim().parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                tracing::error!(key, value = %value, "Setting is not a valid {kind} value");
                None
            }
        }
    }
}

fn flatten(prefix: &str, table: toml::Table, into: &mut BTreeMap<String, toml::Value>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            toml::Value::Table(nested) => flatten(&full_key, nested, into),
            scalar => {
                into.insert(full_key, scalar);
            }
        }
    }
}
