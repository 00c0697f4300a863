//! Agent trait and related types.

use crate::error::Result;
use crate::message::Message;
use crate::registry::TopicRegistry;
use crate::types::AgentId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Metadata about an agent type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Fully qualified type identifier (e.g., "std::plus").
    #[serde(rename = "type")]
    pub agent_type: String,
    /// Short name used as the prefix of generated instance names (e.g., "plus").
    pub short_name: String,
    /// Description of what the agent computes.
    pub description: String,
    /// Names of the inputs, in declaration order. Also the minimum input arity.
    pub inputs: Vec<String>,
    /// Names of the outputs, in declaration order. Also the minimum output arity.
    pub outputs: Vec<String>,
}

impl AgentInfo {
    /// Create agent info for `namespace::name`.
    pub fn new(namespace: &str, name: &str) -> Self {
        Self {
            agent_type: format!("{}::{}", namespace, name),
            short_name: name.to_string(),
            description: String::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set the input names.
    pub fn with_inputs(mut self, inputs: &[&str]) -> Self {
        self.inputs = inputs.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Set the output names.
    pub fn with_outputs(mut self, outputs: &[&str]) -> Self {
        self.outputs = outputs.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Minimum number of input topics.
    pub fn min_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Minimum number of output topics.
    pub fn min_outputs(&self) -> usize {
        self.outputs.len()
    }
}

/// A computational unit that subscribes to topics and publishes to others.
///
/// Agents wire themselves into topics when they are constructed and must be
/// shared as `Arc<dyn Agent>` because topics keep them in their subscriber
/// and publisher sets. Agents reference topics through `Weak` handles only,
/// so the registry stays the sole owner of every topic.
///
/// `receive` runs synchronously on the publishing thread and may publish
/// further; implementations must not hold their own locks while doing so.
pub trait Agent: Send + Sync {
    /// Process-unique identity used for topic set membership.
    fn id(&self) -> AgentId;

    /// Display name, also used to identify the agent in topology graphs.
    fn name(&self) -> &str;

    /// Return the agent to its initial state.
    fn reset(&self);

    /// Handle a message published on `topic`.
    fn receive(&self, topic: &str, message: &Message);

    /// Detach from every topic this agent was wired to.
    ///
    /// Closing is idempotent. A failure names the topics that could not be
    /// reached; the remaining topics are still detached.
    fn close(&self) -> Result<()>;
}

/// Builds agents of one type from `(inputs, outputs)` topic names.
pub trait AgentFactory: Send + Sync {
    /// Metadata of the agent type this factory creates.
    fn info(&self) -> AgentInfo;

    /// Create and wire a new agent instance.
    ///
    /// # Errors
    /// Returns a configuration error when the topic names do not satisfy the
    /// agent's arity or cannot be resolved. Nothing is wired in that case.
    fn create(
        &self,
        topics: &TopicRegistry,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Arc<dyn Agent>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_info_creation() {
        let info = AgentInfo::new("std", "plus")
            .with_description("Adds two inputs")
            .with_inputs(&["x", "y"])
            .with_outputs(&["sum"]);

        assert_eq!(info.agent_type, "std::plus");
        assert_eq!(info.short_name, "plus");
        assert_eq!(info.min_inputs(), 2);
        assert_eq!(info.min_outputs(), 1);
    }

    #[test]
    fn agent_info_serializes_type_field() {
        let info = AgentInfo::new("std", "inc");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "std::inc");
    }
}
