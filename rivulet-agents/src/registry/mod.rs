//! Agent factory registry.
//!
//! Maps type identifiers such as `std::plus` to the factory that builds
//! agents of that type. Configuration loaders resolve every declared agent
//! through this registry; unknown identifiers fail closed.

use crate::math::{BinaryOpFactory, BinaryOperation, IncrementFactory, PlusFactory};
use rivulet_core::error::{Result, RivuletError};
use rivulet_core::registry::TopicRegistry;
use rivulet_core::traits::{Agent, AgentFactory, AgentInfo};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of agent factories keyed by type identifier.
#[derive(Clone, Default)]
pub struct AgentRegistry {
    factories: HashMap<String, Arc<dyn AgentFactory>>,
}

impl AgentRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a factory under the type identifier reported by its info.
    ///
    /// A factory registered later for the same identifier replaces the
    /// earlier one.
    pub fn register(&mut self, factory: impl AgentFactory + 'static) {
        let agent_type = factory.info().agent_type;
        if self
            .factories
            .insert(agent_type.clone(), Arc::new(factory))
            .is_some()
        {
            tracing::warn!(agent_type = %agent_type, "Replacing agent factory");
        }
    }

    /// Get the factory for a type identifier.
    pub fn get(&self, agent_type: &str) -> Option<Arc<dyn AgentFactory>> {
        self.factories.get(agent_type).cloned()
    }

    /// Whether a factory is registered for this type identifier.
    pub fn contains(&self, agent_type: &str) -> bool {
        self.factories.contains_key(agent_type)
    }

    /// Build and wire an agent of `agent_type`.
    ///
    /// # Errors
    /// Returns [`RivuletError::UnknownAgentType`] when no factory is
    /// registered, or the factory's configuration error.
    pub fn create(
        &self,
        agent_type: &str,
        topics: &TopicRegistry,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Arc<dyn Agent>> {
        let factory = self
            .get(agent_type)
            .ok_or_else(|| RivuletError::UnknownAgentType {
                agent_type: agent_type.to_string(),
            })?;
        factory.create(topics, inputs, outputs)
    }

    /// Metadata of every registered agent type, sorted by identifier.
    pub fn all(&self) -> Vec<AgentInfo> {
        let mut infos: Vec<_> = self.factories.values().map(|f| f.info()).collect();
        infos.sort_by(|a, b| a.agent_type.cmp(&b.agent_type));
        infos
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.factories.keys().collect();
        types.sort();
        f.debug_struct("AgentRegistry")
            .field("types", &types)
            .finish()
    }
}

/// Create and populate the standard agent registry.
///
/// Registers `std::inc`, `std::plus` and one `std::<op>` type per
/// [`BinaryOperation`].
pub fn create_standard_registry() -> AgentRegistry {
    let mut registry = AgentRegistry::new();

    registry.register(IncrementFactory);
    registry.register(PlusFactory);
    for operation in BinaryOperation::ALL {
        registry.register(BinaryOpFactory::new(operation));
    }

    registry
}
