//! Resource registration: normalized options become one route group per resource.

use crate::config::{
    default_options, normalize, ConfigLookup, OptionsMap, RawOptions, ResourceOptions,
    AUTH_CONTROLLER,
};
use crate::error::UsageError;
use crate::routes::{GroupAttributes, HttpVerb, RouteTarget, RoutingEngine, REST_ACTIONS};
use crate::state::ResourceRegistry;
use serde_json::Value;
use std::sync::Arc;

/// Middleware token requiring an authenticated request.
pub const AUTH_MIDDLEWARE: &str = "auth";

/// Middleware name tagging requests with the active resource scope (`api-scope:{name}`).
pub const SCOPE_MIDDLEWARE: &str = "api-scope";

/// Resource name used by [`ResourceRouter::auth`].
pub const AUTH_RESOURCE: &str = "auth";

pub fn scope_middleware(name: &str) -> String {
    format!("{}:{}", SCOPE_MIDDLEWARE, name)
}

/// Registers REST resources on a routing engine and keeps their resolved options.
pub struct ResourceRouter<E, C> {
    engine: E,
    config: C,
    defaults: OptionsMap,
    registry: ResourceRegistry,
}

impl<E: RoutingEngine, C: ConfigLookup> ResourceRouter<E, C> {
    /// Defaults are read once from `api.defaultOptions`.
    pub fn new(engine: E, config: C) -> Result<Self, UsageError> {
        let defaults = default_options(&config)?;
        Ok(Self::with_defaults(engine, config, defaults))
    }

    pub fn with_defaults(engine: E, config: C, defaults: OptionsMap) -> Self {
        ResourceRouter {
            engine,
            config,
            defaults,
            registry: ResourceRegistry::new(),
        }
    }

    pub fn set_default_options(&mut self, defaults: OptionsMap) {
        self.defaults = defaults;
    }

    pub fn set_current_scope(&mut self, scope: impl Into<String>) {
        self.registry.set_current_scope(scope);
    }

    pub fn current_resource_options(&self) -> Option<Arc<ResourceOptions>> {
        self.registry.current_resource_options().cloned()
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_parts(self) -> (E, ResourceRegistry) {
        (self.engine, self.registry)
    }

    /// Register the REST routes of `name`.
    pub fn resource(&mut self, name: &str, options: impl Into<RawOptions>) -> Result<(), UsageError> {
        self.resource_with(name, options, |_, _| {})
    }

    /// Register `name`, letting `custom` add routes inside the group before the REST routes.
    pub fn resource_with<F>(
        &mut self,
        name: &str,
        options: impl Into<RawOptions>,
        custom: F,
    ) -> Result<(), UsageError>
    where
        F: FnOnce(&mut E, &ResourceOptions),
    {
        let options = normalize(options.into(), &self.defaults, &self.config)?;
        if self.registry.insert(name, options.clone()).is_some() {
            tracing::warn!(resource = %name, "resource registered twice; keeping the latest options");
        }

        let mut middleware = Vec::new();
        if options.auth {
            middleware.push(AUTH_MIDDLEWARE.to_string());
        }
        middleware.push(scope_middleware(name));

        let attributes = GroupAttributes {
            prefix: name.to_string(),
            middleware,
            namespace: options.namespace.clone().unwrap_or_default(),
        };

        let mut emitted = 0usize;
        self.engine.group(attributes, |engine| {
            custom(engine, &options);
            for spec in REST_ACTIONS.iter().filter(|spec| options.allows(spec.action)) {
                let path = options.route.as_deref().unwrap_or(spec.path);
                let target = RouteTarget::uses(options.handler_for(spec.action.as_str()));
                engine.add_route(spec.verb, path, target);
                emitted += 1;
            }
        });
        tracing::info!(resource = %name, rest_routes = emitted, auth = options.auth, "registered resource");
        Ok(())
    }

    /// Login/logout/user/refresh endpoints under `/auth` with the default auth controller.
    pub fn auth(&mut self) -> Result<(), UsageError> {
        self.auth_with(RawOptions::empty())
    }

    /// Auth endpoints, reachable without authentication. A bare string names the controller.
    pub fn auth_with(&mut self, options: impl Into<RawOptions>) -> Result<(), UsageError> {
        let mut map = options.into().into_map();
        if is_blank(map.get("controller")) {
            map.insert("controller".into(), Value::String(AUTH_CONTROLLER.into()));
            map.insert("namespace".into(), Value::String(String::new()));
        }
        if is_blank(map.get("basename")) {
            map.insert("basename".into(), Value::String("User".into()));
        }
        map.insert("auth".into(), Value::Bool(false));
        map.insert("only".into(), Value::Array(Vec::new()));

        self.resource_with(AUTH_RESOURCE, map, |engine, options| {
            let target = |action: &str| RouteTarget::uses(options.handler_for(action));
            engine.post("login", target("login"));
            engine.get("user", target("user").with_middleware(AUTH_MIDDLEWARE));
            engine.get("logout", target("logout"));
            engine.get("refresh", target("refresh"));

            // Deprecated verbs, kept for older clients.
            engine.patch("refresh", target("refresh"));
            engine.delete("logout", target("logout"));
        })
    }

    /// Group of registrations sharing prefix/middleware/namespace; `f` receives this router.
    pub fn group<F>(&mut self, attributes: GroupAttributes, f: F) -> Result<(), UsageError>
    where
        F: FnOnce(&mut Self) -> Result<(), UsageError>,
    {
        self.engine.begin_group(attributes);
        let result = f(self);
        self.engine.end_group();
        result
    }

    /// Register one concrete route directly on the engine.
    pub fn route(&mut self, verb: HttpVerb, path: &str, target: RouteTarget) {
        self.engine.add_route(verb, path, target);
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}
