//! Capability registry: fixed table from intent category to handler.

use std::collections::HashMap;
use std::sync::Arc;

use super::{Capability, ContentCapability, GeneralCapability, SocialCapability, canned};
use crate::intent::Category;
use crate::llm::LlmProvider;

/// Maps each category to the capability that handles it.
///
/// Lookups for categories without a binding resolve to the general
/// capability, so `resolve` is total.
pub struct CapabilityRegistry {
    bindings: HashMap<Category, Arc<dyn Capability>>,
    general: Arc<dyn Capability>,
}

impl CapabilityRegistry {
    /// Registry with only the general capability bound.
    pub fn new(general: Arc<dyn Capability>) -> Self {
        let mut bindings: HashMap<Category, Arc<dyn Capability>> = HashMap::new();
        bindings.insert(Category::General, Arc::clone(&general));
        Self { bindings, general }
    }

    /// Registry with every built-in capability bound.
    pub fn with_defaults(llm: Arc<dyn LlmProvider>) -> Self {
        let mut registry = Self::new(Arc::new(GeneralCapability::new(llm)));

        registry.bind(Category::Email, Arc::new(canned::email()));
        registry.bind(Category::Calendar, Arc::new(canned::calendar()));
        registry.bind(Category::Phone, Arc::new(canned::phone()));
        registry.bind(Category::Research, Arc::new(canned::research()));
        registry.bind(Category::Social, Arc::new(SocialCapability));
        registry.bind(
            Category::ClientManagement,
            Arc::new(canned::client_management()),
        );
        registry.bind(
            Category::BusinessIntelligence,
            Arc::new(canned::business_intelligence()),
        );
        registry.bind(Category::Productivity, Arc::new(canned::productivity()));

        let content: Arc<dyn Capability> = Arc::new(ContentCapability);
        registry.bind(Category::Prompts, Arc::clone(&content));
        registry.bind(Category::Content, content);

        tracing::debug!(bound = registry.bindings.len(), "Capability registry built");
        registry
    }

    /// Bind a capability to a category, replacing any previous binding.
    /// Binding `General` also replaces the fallback handler.
    pub fn bind(&mut self, category: Category, capability: Arc<dyn Capability>) {
        if category == Category::General {
            self.general = Arc::clone(&capability);
        }
        self.bindings.insert(category, capability);
    }

    /// Capability for a category, falling back to the general handler.
    pub fn resolve(&self, category: Category) -> Arc<dyn Capability> {
        match self.bindings.get(&category) {
            Some(capability) => Arc::clone(capability),
            None => {
                tracing::debug!(category = %category, "No capability bound, using general");
                Arc::clone(&self.general)
            }
        }
    }

    /// Whether a category has its own binding.
    pub fn is_bound(&self, category: Category) -> bool {
        self.bindings.contains_key(&category)
    }
}
