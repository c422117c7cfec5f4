//! Raw, caller-supplied resource options.

use crate::error::{json_type_name, UsageError};
use serde_json::{Map, Value};

/// Loose key-value options, as written by the caller or in config.
pub type OptionsMap = Map<String, Value>;

/// Options as passed to `resource(...)`: a bare controller reference or a partial map.
#[derive(Clone, Debug, PartialEq)]
pub enum RawOptions {
    Controller(String),
    Map(OptionsMap),
}

impl RawOptions {
    /// Empty option map; every field falls back to defaults.
    pub fn empty() -> Self {
        RawOptions::Map(OptionsMap::new())
    }

    /// Coerce into a map form: a bare reference becomes `{controller: ...}`.
    pub fn into_map(self) -> OptionsMap {
        match self {
            RawOptions::Controller(controller) => {
                let mut map = OptionsMap::new();
                map.insert("controller".into(), Value::String(controller));
                map
            }
            RawOptions::Map(map) => map,
        }
    }

    /// Set a key, coercing a bare reference into map form first.
    pub fn with(self, key: &str, value: impl Into<Value>) -> Self {
        let mut map = self.into_map();
        map.insert(key.to_string(), value.into());
        RawOptions::Map(map)
    }
}

impl Default for RawOptions {
    fn default() -> Self {
        RawOptions::empty()
    }
}

impl From<&str> for RawOptions {
    fn from(controller: &str) -> Self {
        RawOptions::Controller(controller.to_string())
    }
}

impl From<String> for RawOptions {
    fn from(controller: String) -> Self {
        RawOptions::Controller(controller)
    }
}

impl From<OptionsMap> for RawOptions {
    fn from(map: OptionsMap) -> Self {
        RawOptions::Map(map)
    }
}

impl TryFrom<Value> for RawOptions {
    type Error = UsageError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(RawOptions::Controller(s)),
            Value::Object(map) => Ok(RawOptions::Map(map)),
            other => Err(UsageError::MalformedOptions(json_type_name(&other))),
        }
    }
}
