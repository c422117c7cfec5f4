//! Registry of resolved options per resource name. Written during startup, read-only after.

use crate::config::ResourceOptions;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, Arc<ResourceOptions>>,
    current_scope: Option<String>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store options under `name`. Returns the replaced entry, if any.
    pub fn insert(&mut self, name: &str, options: ResourceOptions) -> Option<Arc<ResourceOptions>> {
        self.resources.insert(name.to_string(), Arc::new(options))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ResourceOptions>> {
        self.resources.get(name)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn set_current_scope(&mut self, scope: impl Into<String>) {
        self.current_scope = Some(scope.into());
    }

    /// Options of the current scope's resource; `None` when no scope is set or it names no resource.
    pub fn current_resource_options(&self) -> Option<&Arc<ResourceOptions>> {
        self.current_scope.as_deref().and_then(|scope| self.get(scope))
    }
}
