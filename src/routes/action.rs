//! REST conventions: HTTP verbs, the five actions and the verb-alias table.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestAction {
    Index,
    Create,
    Read,
    Update,
    Delete,
}

impl RestAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestAction::Index => "index",
            RestAction::Create => "create",
            RestAction::Read => "read",
            RestAction::Update => "update",
            RestAction::Delete => "delete",
        }
    }
}

impl fmt::Display for RestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl FromStr for RestAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        REST_ACTIONS
            .iter()
            .map(|spec| spec.action)
            .find(|action| action.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionSpec {
    pub action: RestAction,
    pub verb: HttpVerb,
    /// Conventional path fragment appended under the resource prefix.
    pub path: &'static str,
}

/// Canonical action table. Emission always follows this order.
pub static REST_ACTIONS: [ActionSpec; 5] = [
    ActionSpec { action: RestAction::Index, verb: HttpVerb::Get, path: "" },
    ActionSpec { action: RestAction::Create, verb: HttpVerb::Post, path: "" },
    ActionSpec { action: RestAction::Read, verb: HttpVerb::Get, path: "/{id}" },
    ActionSpec { action: RestAction::Update, verb: HttpVerb::Patch, path: "/{id}" },
    ActionSpec { action: RestAction::Delete, verb: HttpVerb::Delete, path: "/{id}" },
];

/// Single-route shorthand names and the action each one registers.
pub const VERB_ALIASES: [(&str, RestAction); 4] = [
    ("get", RestAction::Read),
    ("post", RestAction::Create),
    ("patch", RestAction::Update),
    ("destroy", RestAction::Delete),
];

pub fn verb_alias(name: &str) -> Option<RestAction> {
    VERB_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, action)| *action)
}
