//! Single-action shorthands, resolved through an explicit dispatch table.
//!
//! Action names (`index`, `create`, `read`, `update`, `delete`) register one REST action of a
//! resource. Verb aliases (`get`, `post`, `patch`, `destroy`) register one action exactly at the
//! given url. Engine-native verbs not claimed by either table (`put`, `options`) pass through as
//! raw routes.

use crate::config::{ConfigLookup, OptionsMap, RawOptions};
use crate::error::{json_type_name, UsageError};
use crate::registrar::ResourceRouter;
use crate::routes::{verb_alias, HttpVerb, RestAction, RouteTarget, RoutingEngine};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shorthand {
    /// `(name, options)` registering only this action.
    Action(RestAction),
    /// `(url, controller)` registering this action with an empty path.
    Verb(RestAction),
    /// `(path, target)` forwarded to the engine.
    PassThrough(HttpVerb),
}

impl Shorthand {
    pub fn lookup(op: &str) -> Option<Shorthand> {
        if let Ok(action) = op.parse::<RestAction>() {
            return Some(Shorthand::Action(action));
        }
        if let Some(action) = verb_alias(op) {
            return Some(Shorthand::Verb(action));
        }
        match op {
            "put" => Some(Shorthand::PassThrough(HttpVerb::Put)),
            "options" => Some(Shorthand::PassThrough(HttpVerb::Options)),
            _ => None,
        }
    }
}

impl<E: RoutingEngine, C: ConfigLookup> ResourceRouter<E, C> {
    /// Dispatch an operation by name. Unknown names are a usage error.
    pub fn dispatch(
        &mut self,
        op: &str,
        first: &str,
        second: impl Into<RawOptions>,
    ) -> Result<(), UsageError> {
        match Shorthand::lookup(op) {
            Some(Shorthand::Action(action)) => self.single_action(action, first, second.into()),
            Some(Shorthand::Verb(action)) => {
                let controller = controller_reference(second.into())?;
                self.single_verb(action, first, &controller)
            }
            Some(Shorthand::PassThrough(verb)) => {
                let target = route_target(second.into())?;
                self.route(verb, first, target);
                Ok(())
            }
            None => Err(UsageError::UnknownOperation(op.to_string())),
        }
    }

    fn single_action(
        &mut self,
        action: RestAction,
        name: &str,
        options: RawOptions,
    ) -> Result<(), UsageError> {
        let options = options.with("only", vec![Value::String(action.as_str().into())]);
        self.resource(name, options)
    }

    fn single_verb(&mut self, action: RestAction, url: &str, controller: &str) -> Result<(), UsageError> {
        let options = RawOptions::from(controller)
            .with("only", vec![Value::String(action.as_str().into())])
            .with("route", "");
        self.resource(url, options)
    }

    pub fn index(&mut self, name: &str, options: impl Into<RawOptions>) -> Result<(), UsageError> {
        self.single_action(RestAction::Index, name, options.into())
    }

    pub fn create(&mut self, name: &str, options: impl Into<RawOptions>) -> Result<(), UsageError> {
        self.single_action(RestAction::Create, name, options.into())
    }

    pub fn read(&mut self, name: &str, options: impl Into<RawOptions>) -> Result<(), UsageError> {
        self.single_action(RestAction::Read, name, options.into())
    }

    pub fn update(&mut self, name: &str, options: impl Into<RawOptions>) -> Result<(), UsageError> {
        self.single_action(RestAction::Update, name, options.into())
    }

    pub fn delete(&mut self, name: &str, options: impl Into<RawOptions>) -> Result<(), UsageError> {
        self.single_action(RestAction::Delete, name, options.into())
    }

    /// `GET {url}` handled by `controller@read`.
    pub fn get(&mut self, url: &str, controller: &str) -> Result<(), UsageError> {
        self.single_verb(RestAction::Read, url, controller)
    }

    /// `POST {url}` handled by `controller@create`.
    pub fn post(&mut self, url: &str, controller: &str) -> Result<(), UsageError> {
        self.single_verb(RestAction::Create, url, controller)
    }

    /// `PATCH {url}` handled by `controller@update`.
    pub fn patch(&mut self, url: &str, controller: &str) -> Result<(), UsageError> {
        self.single_verb(RestAction::Update, url, controller)
    }

    /// `DELETE {url}` handled by `controller@delete`.
    pub fn destroy(&mut self, url: &str, controller: &str) -> Result<(), UsageError> {
        self.single_verb(RestAction::Delete, url, controller)
    }
}

fn controller_reference(options: RawOptions) -> Result<String, UsageError> {
    match options {
        RawOptions::Controller(controller) => Ok(controller),
        RawOptions::Map(_) => Err(UsageError::InvalidField {
            field: "controller".into(),
            expected: "a controller reference",
            got: "object",
        }),
    }
}

/// A bare reference, or `{uses, middleware?}`.
fn route_target(options: RawOptions) -> Result<RouteTarget, UsageError> {
    let map: OptionsMap = match options {
        RawOptions::Controller(uses) => return Ok(RouteTarget::uses(uses)),
        RawOptions::Map(map) => map,
    };
    let uses = match map.get("uses") {
        Some(Value::String(s)) => s.clone(),
        other => {
            return Err(UsageError::InvalidField {
                field: "uses".into(),
                expected: "a string",
                got: other.map_or("nothing", json_type_name),
            })
        }
    };
    let mut target = RouteTarget::uses(uses);
    match map.get("middleware") {
        None | Some(Value::Null) => {}
        Some(Value::String(m)) => target = target.with_middleware(m.clone()),
        Some(Value::Array(items)) => {
            for item in items {
                match item {
                    Value::String(m) => target = target.with_middleware(m.clone()),
                    other => {
                        return Err(UsageError::InvalidField {
                            field: "middleware".into(),
                            expected: "a string or an array of strings",
                            got: json_type_name(other),
                        })
                    }
                }
            }
        }
        Some(other) => {
            return Err(UsageError::InvalidField {
                field: "middleware".into(),
                expected: "a string or an array of strings",
                got: json_type_name(other),
            })
        }
    }
    Ok(target)
}
