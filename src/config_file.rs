//! Raw module configuration
//!
//! The partitioning configuration arrives as an untyped key/value map (the
//! module's YAML file). Getters here are deliberately lenient: a missing key
//! or a value of the wrong shape yields the caller's default, never an error.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::error::PartcfgError;

/// Untyped configuration map, keyed by setting name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationMap(Map<String, Value>);

impl ConfigurationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and programmatic setup
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Boolean setting; anything that is not a boolean yields `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            _ => default,
        }
    }

    /// String setting. Scalars are converted to their text form.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.0
            .get(key)
            .and_then(scalar_to_string)
            .unwrap_or_else(|| default.to_string())
    }

    /// String-list setting. A lone scalar counts as a one-element list and
    /// non-scalar list items are dropped.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
            Some(v) => scalar_to_string(v).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Real-number setting. Numeric strings are accepted; infinities and
    /// NaN yield `default`.
    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        let value = match self.0.get(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite()).unwrap_or(default)
    }

    /// Build from a parsed document, which must be a mapping.
    ///
    /// An empty document (`null`) is treated as an empty configuration.
    pub fn from_value(value: Value) -> std::result::Result<Self, PartcfgError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(PartcfgError::config(format!(
                "expected a mapping at the top level, found {}",
                value_kind(&other)
            ))),
        }
    }

    pub fn from_yaml_str(s: &str) -> std::result::Result<Self, PartcfgError> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(s)?;
        Self::from_value(value)
    }

    pub fn from_json_str(s: &str) -> std::result::Result<Self, PartcfgError> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_value(value)
    }

    /// Load a configuration file. `.json` files are read as JSON, everything
    /// else (`.conf`, `.yaml`, ...) as YAML.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {:?}", path))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let map = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };

        map.with_context(|| format!("Failed to parse configuration {:?}", path))
    }
}

impl From<Map<String, Value>> for ConfigurationMap {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
