//! Key-value configuration lookup injected into the router at construction.

use crate::config::OptionsMap;
use crate::error::{json_type_name, ConfigError, UsageError};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Env var naming the JSON config file read by [`JsonConfig::from_env`].
pub const CONFIG_PATH_ENV: &str = "RESOURCE_ROUTER_CONFIG";

/// Key holding the options merged under every resource registration.
pub const DEFAULT_OPTIONS_KEY: &str = "api.defaultOptions";

/// Namespace categories resolved by the normalizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NamespaceCategory {
    Controller,
    Model,
    Resource,
}

impl NamespaceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamespaceCategory::Controller => "controller",
            NamespaceCategory::Model => "model",
            NamespaceCategory::Resource => "resource",
        }
    }

    /// Config key holding this category's namespace prefix, e.g. `api.namespace.controller`.
    pub fn config_key(&self) -> String {
        format!("api.namespace.{}", self.as_str())
    }
}

pub trait ConfigLookup {
    fn get(&self, key: &str) -> Option<Value>;
}

impl ConfigLookup for HashMap<String, Value> {
    fn get(&self, key: &str) -> Option<Value> {
        HashMap::get(self, key).cloned()
    }
}

/// Namespace prefix configured for a category; non-string or missing values count as empty.
pub fn namespace_for(config: &dyn ConfigLookup, category: NamespaceCategory) -> String {
    match config.get(&category.config_key()) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Default options bundle from `api.defaultOptions`. Absent or null means none.
pub fn default_options(config: &dyn ConfigLookup) -> Result<OptionsMap, UsageError> {
    match config.get(DEFAULT_OPTIONS_KEY) {
        None | Some(Value::Null) => Ok(OptionsMap::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(UsageError::InvalidField {
            field: DEFAULT_OPTIONS_KEY.into(),
            expected: "an object",
            got: json_type_name(&other),
        }),
    }
}

/// JSON document with dotted-key lookup (`api.namespace.controller` walks nested objects).
#[derive(Clone, Debug, Default)]
pub struct JsonConfig {
    root: Value,
}

impl JsonConfig {
    pub fn new(root: Value) -> Self {
        JsonConfig { root }
    }

    pub fn empty() -> Self {
        JsonConfig::new(Value::Object(OptionsMap::new()))
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(JsonConfig::new(serde_json::from_str(s)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading router config");
        JsonConfig::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Load from the file named by `RESOURCE_ROUTER_CONFIG` (after reading `.env`); empty when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => JsonConfig::from_path(path.trim()),
            _ => Ok(JsonConfig::empty()),
        }
    }
}

impl ConfigLookup for JsonConfig {
    fn get(&self, key: &str) -> Option<Value> {
        key.split('.')
            .try_fold(&self.root, |node, part| node.as_object()?.get(part))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_lookup_walks_objects() {
        let config = JsonConfig::new(json!({
            "api": { "namespace": { "controller": "app::controllers" } }
        }));
        assert_eq!(
            config.get("api.namespace.controller"),
            Some(json!("app::controllers"))
        );
        assert_eq!(config.get("api.namespace.model"), None);
        assert_eq!(config.get("api.namespace.controller.deeper"), None);
        assert_eq!(
            namespace_for(&config, NamespaceCategory::Controller),
            "app::controllers"
        );
        assert_eq!(namespace_for(&config, NamespaceCategory::Model), "");
    }

    #[test]
    fn default_options_must_be_object() {
        let config = JsonConfig::new(json!({ "api": { "defaultOptions": { "auth": false } } }));
        assert_eq!(default_options(&config).unwrap()["auth"], json!(false));
        assert!(default_options(&JsonConfig::empty()).unwrap().is_empty());

        let bad = JsonConfig::new(json!({ "api": { "defaultOptions": "nope" } }));
        assert!(default_options(&bad).is_err());
    }

    fn temp_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.json", name, std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = JsonConfig::from_json_str("{ \"api\": ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        let path = temp_config("resource-router-malformed", "not json");
        let err = JsonConfig::from_path(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("resource-router-does-not-exist.json");
        let err = JsonConfig::from_path(path).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn loads_config_file() {
        let path = temp_config(
            "resource-router-load",
            r#"{ "api": { "namespace": { "model": "app::models" }, "defaultOptions": { "auth": false } } }"#,
        );
        let config = JsonConfig::from_path(&path);
        std::fs::remove_file(&path).ok();
        let config = config.unwrap();
        assert_eq!(namespace_for(&config, NamespaceCategory::Model), "app::models");
        assert_eq!(default_options(&config).unwrap()["auth"], json!(false));
    }

    // single test so the env var is never mutated concurrently
    #[test]
    fn env_var_selects_config_file() {
        std::env::remove_var(CONFIG_PATH_ENV);
        assert_eq!(JsonConfig::from_env().unwrap().get("api"), None);

        std::env::set_var(CONFIG_PATH_ENV, "   ");
        assert_eq!(JsonConfig::from_env().unwrap().get("api"), None);

        let path = temp_config(
            "resource-router-env",
            r#"{ "api": { "namespace": { "controller": "app::controllers" } } }"#,
        );
        std::env::set_var(CONFIG_PATH_ENV, format!(" {} ", path.display()));
        let config = JsonConfig::from_env();
        std::env::remove_var(CONFIG_PATH_ENV);
        std::fs::remove_file(&path).ok();
        assert_eq!(
            namespace_for(&config.unwrap(), NamespaceCategory::Controller),
            "app::controllers"
        );
    }
}
