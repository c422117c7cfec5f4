//! In-memory route table: flattens nested groups into concrete route entries.

use crate::config::NAMESPACE_DELIMITER;
use crate::routes::{GroupAttributes, HttpVerb, RouteTarget, RoutingEngine};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub verb: HttpVerb,
    /// Full path, always starting with `/`.
    pub path: String,
    /// Handler reference with the group namespace applied.
    pub uses: String,
    /// Group middleware (outermost first) followed by route middleware.
    pub middleware: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: Vec<RouteEntry>,
    groups: Vec<GroupAttributes>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn find(&self, verb: HttpVerb, path: &str) -> Option<&RouteEntry> {
        self.routes.iter().find(|r| r.verb == verb && r.path == path)
    }

    /// Number of groups currently open.
    pub fn depth(&self) -> usize {
        self.groups.len()
    }

    fn full_path(&self, path: &str) -> String {
        let segments: Vec<&str> = self
            .groups
            .iter()
            .map(|g| g.prefix.as_str())
            .chain(std::iter::once(path))
            .map(|s| s.trim_matches('/'))
            .filter(|s| !s.is_empty())
            .collect();
        format!("/{}", segments.join("/"))
    }

    fn namespace(&self) -> String {
        self.groups
            .iter()
            .map(|g| g.namespace.trim_matches(':'))
            .filter(|ns| !ns.is_empty())
            .collect::<Vec<_>>()
            .join(NAMESPACE_DELIMITER)
    }
}

impl RoutingEngine for RouteTable {
    fn begin_group(&mut self, attributes: GroupAttributes) {
        self.groups.push(attributes);
    }

    fn end_group(&mut self) {
        if self.groups.pop().is_none() {
            tracing::warn!("end_group called with no open group");
        }
    }

    fn add_route(&mut self, verb: HttpVerb, path: &str, target: RouteTarget) {
        let namespace = self.namespace();
        let uses = if namespace.is_empty() {
            target.uses
        } else {
            format!("{}{}{}", namespace, NAMESPACE_DELIMITER, target.uses)
        };
        let middleware = self
            .groups
            .iter()
            .flat_map(|g| g.middleware.iter().cloned())
            .chain(target.middleware)
            .collect();
        let entry = RouteEntry {
            verb,
            path: self.full_path(path),
            uses,
            middleware,
        };
        tracing::debug!(verb = %entry.verb, path = %entry.path, uses = %entry.uses, "route");
        self.routes.push(entry);
    }
}
