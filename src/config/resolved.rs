//! Resolved resource options: normalized once, read-only afterwards.

use crate::config::OptionsMap;
use crate::routes::RestAction;
use serde::Serialize;

/// Fallback controller when a registration names none.
pub const REST_CONTROLLER: &str = "api::controllers::RestController";

/// Controller used by the auth convenience registration.
pub const AUTH_CONTROLLER: &str = "api::controllers::AuthController";

/// Separator between namespace segments and a controller / model name.
pub const NAMESPACE_DELIMITER: &str = "::";

/// Separator between a controller reference and an action name.
pub const ACTION_DELIMITER: &str = "@";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResourceOptions {
    /// Never empty.
    pub controller: String,
    pub namespace: Option<String>,
    pub basename: Option<String>,
    /// Namespace-qualified model reference.
    pub model: Option<String>,
    /// Namespace-qualified resource (presenter) reference.
    pub resource: Option<String>,
    pub auth: bool,
    /// Allowed REST actions in canonical order; `None` means all.
    pub only: Option<Vec<RestAction>>,
    /// Path fragment applied to every emitted action.
    pub route: Option<String>,
    /// Caller keys the normalizer does not interpret.
    pub extra: OptionsMap,
}

impl ResourceOptions {
    /// Handler reference for one action, e.g. `WidgetController@read`.
    pub fn handler_for(&self, action: &str) -> String {
        format!("{}{}{}", self.controller, ACTION_DELIMITER, action)
    }

    pub fn allows(&self, action: RestAction) -> bool {
        self.only.as_ref().map_or(true, |only| only.contains(&action))
    }
}
