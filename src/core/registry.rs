//! Named workflow engine components.
//!
//! The registry is filled once at startup and then shared read-only; the API
//! never adds or removes components.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::adapters::WorkflowComponent;

use super::error::ApiError;

/// Registry of workflow components by name
#[derive(Default, Clone)]
pub struct ComponentRegistry {
    components: BTreeMap<String, Arc<dyn WorkflowComponent>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component, replacing any previous one with the same name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        component: Arc<dyn WorkflowComponent>,
    ) -> Option<Arc<dyn WorkflowComponent>> {
        self.components.insert(name.into(), component)
    }

    /// Builder-style registration
    pub fn with_component(
        mut self,
        name: impl Into<String>,
        component: Arc<dyn WorkflowComponent>,
    ) -> Self {
        self.register(name, component);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn WorkflowComponent>> {
        self.components.get(name).cloned()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.components.iter().map(|(name, c)| (name, c.name())))
            .finish()
    }
}

/// Look up the component a call should be dispatched to
pub fn resolve_component(
    registry: &ComponentRegistry,
    name: &str,
) -> Result<Arc<dyn WorkflowComponent>, ApiError> {
    if name.is_empty() {
        return Err(ApiError::MissingComponentName);
    }

    registry
        .get(name)
        .ok_or_else(|| ApiError::UnknownComponent {
            name: name.to_string(),
        })
}
