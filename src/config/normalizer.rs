//! Option normalization: merge defaults, then resolve auth, controller, namespace and targets.

use crate::config::{
    namespace_for, ConfigLookup, NamespaceCategory, OptionsMap, RawOptions, ResourceOptions,
    NAMESPACE_DELIMITER, REST_CONTROLLER,
};
use crate::error::{json_type_name, UsageError};
use crate::routes::{RestAction, REST_ACTIONS};
use serde_json::Value;

const KNOWN_KEYS: &[&str] = &[
    "controller",
    "namespace",
    "basename",
    "model",
    "resource",
    "auth",
    "only",
    "route",
];

/// Build resolved options from caller options overlaid on `defaults` (caller wins).
pub fn normalize(
    raw: RawOptions,
    defaults: &OptionsMap,
    config: &dyn ConfigLookup,
) -> Result<ResourceOptions, UsageError> {
    let mut merged = defaults.clone();
    merged.extend(raw.into_map());

    let auth = bool_field(&merged, "auth")?.unwrap_or(true);

    let mut namespace = string_field(&merged, "namespace")?;
    let controller = match string_field(&merged, "controller")?.filter(|c| !c.is_empty()) {
        None => REST_CONTROLLER.to_string(),
        Some(controller) => {
            if namespace.is_none() {
                namespace = Some(namespace_for(config, NamespaceCategory::Controller))
                    .filter(|ns| !ns.is_empty());
            }
            controller
        }
    };

    let basename = string_field(&merged, "basename")?;
    let model = resolve_target(&merged, "model", basename.as_deref(), NamespaceCategory::Model, config)?;
    let resource = resolve_target(
        &merged,
        "resource",
        basename.as_deref(),
        NamespaceCategory::Resource,
        config,
    )?;

    let only = only_field(&merged)?;
    let route = string_field(&merged, "route")?;

    let extra = merged
        .into_iter()
        .filter(|(k, _)| !KNOWN_KEYS.contains(&k.as_str()))
        .collect();

    Ok(ResourceOptions {
        controller,
        namespace,
        basename,
        model,
        resource,
        auth,
        only,
        route,
        extra,
    })
}

/// `category namespace` + delimiter + `name`; the delimiter only when the namespace is non-empty.
pub fn qualify(config: &dyn ConfigLookup, category: NamespaceCategory, name: &str) -> String {
    let ns = namespace_for(config, category);
    if ns.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", ns, NAMESPACE_DELIMITER, name)
    }
}

fn resolve_target(
    map: &OptionsMap,
    field: &str,
    basename: Option<&str>,
    category: NamespaceCategory,
    config: &dyn ConfigLookup,
) -> Result<Option<String>, UsageError> {
    let name = string_field(map, field)?.or_else(|| basename.map(str::to_string));
    Ok(name
        .filter(|n| !n.is_empty())
        .map(|n| qualify(config, category, &n)))
}

fn string_field(map: &OptionsMap, field: &str) -> Result<Option<String>, UsageError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(invalid(field, "a string", other)),
    }
}

fn bool_field(map: &OptionsMap, field: &str) -> Result<Option<bool>, UsageError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(invalid(field, "a boolean", other)),
    }
}

/// Intersect with the action table, keeping the table's order. Unknown names are dropped.
fn only_field(map: &OptionsMap) -> Result<Option<Vec<RestAction>>, UsageError> {
    let items = match map.get("only") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => return Err(invalid("only", "an array of action names", other)),
    };
    let mut names = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) => names.push(s.as_str()),
            other => return Err(invalid("only", "an array of action names", other)),
        }
    }
    for name in &names {
        if name.parse::<RestAction>().is_err() {
            tracing::debug!(action = %name, "ignoring unknown action in 'only'");
        }
    }
    Ok(Some(
        REST_ACTIONS
            .iter()
            .map(|spec| spec.action)
            .filter(|action| names.contains(&action.as_str()))
            .collect(),
    ))
}

fn invalid(field: &str, expected: &'static str, got: &Value) -> UsageError {
    UsageError::InvalidField {
        field: field.to_string(),
        expected,
        got: json_type_name(got),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JsonConfig;
    use serde_json::json;

    fn map(v: Value) -> OptionsMap {
        match v {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    fn namespaced() -> JsonConfig {
        JsonConfig::new(json!({
            "api": {
                "namespace": {
                    "controller": "app::controllers",
                    "model": "app::models",
                    "resource": ""
                }
            }
        }))
    }

    #[test]
    fn auth_defaults_to_true_unless_defaults_say_otherwise() {
        let config = JsonConfig::empty();
        let opts = normalize(RawOptions::empty(), &OptionsMap::new(), &config).unwrap();
        assert!(opts.auth);

        let defaults = map(json!({ "auth": false }));
        let opts = normalize(RawOptions::empty(), &defaults, &config).unwrap();
        assert!(!opts.auth);

        let opts = normalize(RawOptions::empty().with("auth", true), &defaults, &config).unwrap();
        assert!(opts.auth);
    }

    #[test]
    fn missing_controller_falls_back_without_namespace() {
        let opts = normalize(RawOptions::empty(), &OptionsMap::new(), &namespaced()).unwrap();
        assert_eq!(opts.controller, REST_CONTROLLER);
        assert_eq!(opts.namespace, None);

        let opts = normalize(RawOptions::from(""), &OptionsMap::new(), &namespaced()).unwrap();
        assert_eq!(opts.controller, REST_CONTROLLER);
    }

    #[test]
    fn controller_namespace_from_config_unless_given() {
        let opts = normalize(RawOptions::from("WidgetController"), &OptionsMap::new(), &namespaced())
            .unwrap();
        assert_eq!(opts.controller, "WidgetController");
        assert_eq!(opts.namespace.as_deref(), Some("app::controllers"));

        let raw = RawOptions::from("WidgetController").with("namespace", "");
        let opts = normalize(raw, &OptionsMap::new(), &namespaced()).unwrap();
        assert_eq!(opts.namespace.as_deref(), Some(""));
    }

    #[test]
    fn targets_resolve_from_basename_per_category() {
        let raw = RawOptions::from("WidgetController").with("basename", "Widget");
        let opts = normalize(raw, &OptionsMap::new(), &namespaced()).unwrap();
        assert_eq!(opts.model.as_deref(), Some("app::models::Widget"));
        // empty category namespace: no delimiter
        assert_eq!(opts.resource.as_deref(), Some("Widget"));

        let raw = RawOptions::empty()
            .with("basename", "Widget")
            .with("model", "Gadget");
        let opts = normalize(raw, &OptionsMap::new(), &namespaced()).unwrap();
        assert_eq!(opts.model.as_deref(), Some("app::models::Gadget"));
        assert_eq!(opts.resource.as_deref(), Some("Widget"));

        let opts = normalize(RawOptions::empty(), &OptionsMap::new(), &namespaced()).unwrap();
        assert_eq!(opts.model, None);
        assert_eq!(opts.resource, None);
    }

    #[test]
    fn explicit_empty_target_does_not_use_basename() {
        let raw = RawOptions::empty()
            .with("basename", "User")
            .with("model", "")
            .with("resource", "");
        let opts = normalize(raw, &OptionsMap::new(), &namespaced()).unwrap();
        assert_eq!(opts.model, None);
        assert_eq!(opts.resource, None);
    }

    #[test]
    fn only_keeps_table_order_and_drops_unknown() {
        let raw = RawOptions::empty().with("only", json!(["delete", "bogus", "index", "read"]));
        let opts = normalize(raw, &OptionsMap::new(), &JsonConfig::empty()).unwrap();
        assert_eq!(
            opts.only,
            Some(vec![RestAction::Index, RestAction::Read, RestAction::Delete])
        );
    }

    #[test]
    fn malformed_fields_are_usage_errors() {
        let config = JsonConfig::empty();
        let none = OptionsMap::new();
        assert!(normalize(RawOptions::empty().with("auth", "yes"), &none, &config).is_err());
        assert!(normalize(RawOptions::empty().with("only", "read"), &none, &config).is_err());
        assert!(normalize(RawOptions::empty().with("only", json!([1])), &none, &config).is_err());
        assert!(normalize(RawOptions::empty().with("controller", 5), &none, &config).is_err());
    }

    #[test]
    fn unknown_keys_are_kept_as_extra() {
        let defaults = map(json!({ "perPage": 20 }));
        let raw = RawOptions::from("WidgetController").with("policy", "owner");
        let opts = normalize(raw, &defaults, &JsonConfig::empty()).unwrap();
        assert_eq!(opts.extra["perPage"], json!(20));
        assert_eq!(opts.extra["policy"], json!("owner"));
        assert!(!opts.extra.contains_key("controller"));
    }
}
