//! Routing engine seam: scoped groups and concrete route registration.

use crate::routes::HttpVerb;
use serde::Serialize;

/// Attributes inherited by every route registered inside a group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GroupAttributes {
    pub prefix: String,
    pub middleware: Vec<String>,
    pub namespace: String,
}

/// Handler reference plus route-level middleware.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RouteTarget {
    pub uses: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub middleware: Vec<String>,
}

impl RouteTarget {
    pub fn uses(reference: impl Into<String>) -> Self {
        RouteTarget {
            uses: reference.into(),
            middleware: Vec::new(),
        }
    }

    pub fn with_middleware(mut self, middleware: impl Into<String>) -> Self {
        self.middleware.push(middleware.into());
        self
    }
}

pub trait RoutingEngine {
    fn begin_group(&mut self, attributes: GroupAttributes);

    fn end_group(&mut self);

    fn add_route(&mut self, verb: HttpVerb, path: &str, target: RouteTarget);

    /// Run `f` inside a group; the group is closed when `f` returns.
    fn group<F>(&mut self, attributes: GroupAttributes, f: F)
    where
        Self: Sized,
        F: FnOnce(&mut Self),
    {
        self.begin_group(attributes);
        f(self);
        self.end_group();
    }

    fn get(&mut self, path: &str, target: RouteTarget) {
        self.add_route(HttpVerb::Get, path, target)
    }

    fn post(&mut self, path: &str, target: RouteTarget) {
        self.add_route(HttpVerb::Post, path, target)
    }

    fn put(&mut self, path: &str, target: RouteTarget) {
        self.add_route(HttpVerb::Put, path, target)
    }

    fn patch(&mut self, path: &str, target: RouteTarget) {
        self.add_route(HttpVerb::Patch, path, target)
    }

    fn delete(&mut self, path: &str, target: RouteTarget) {
        self.add_route(HttpVerb::Delete, path, target)
    }

    fn options(&mut self, path: &str, target: RouteTarget) {
        self.add_route(HttpVerb::Options, path, target)
    }
}
