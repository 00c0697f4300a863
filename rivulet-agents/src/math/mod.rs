//! Numeric agents.
//!
//! Every agent in this module reads the numeric view of incoming messages
//! and publishes numbers. Non-numeric input reads as NaN and flows through
//! the arithmetic like any other value.
//!
//! - [`IncrementAgent`] - Adds one to its input (`std::inc`)
//! - [`PlusAgent`] - Sums two inputs it remembers locally (`std::plus`)
//! - [`BinaryOpAgent`] - Applies a binary function to two input topics
//!   (`std::add`, `std::sub`, `std::mul`, `std::div`, `std::min`, `std::max`, `std::pow`)

mod binary;
mod increment;
mod plus;

pub use binary::{BinaryFn, BinaryOpAgent, BinaryOperation};
pub use increment::IncrementAgent;
pub use plus::PlusAgent;

use rivulet_core::error::Result;
use rivulet_core::registry::TopicRegistry;
use rivulet_core::traits::{Agent, AgentFactory, AgentInfo};
use rivulet_core::types::AgentId;
use std::sync::Arc;

/// Generate an instance name such as `plus#4` from the agent's short type name.
///
/// The numeric part is the agent's identity, so names never repeat within a
/// process.
pub fn instance_name(info: &AgentInfo, id: AgentId) -> String {
    format!("{}#{}", info.short_name, id.as_u64())
}

/// Factory for [`IncrementAgent`].
pub struct IncrementFactory;

impl AgentFactory for IncrementFactory {
    fn info(&self) -> AgentInfo {
        IncrementAgent::info()
    }

    fn create(
        &self,
        topics: &TopicRegistry,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Arc<dyn Agent>> {
        Ok(IncrementAgent::new(topics, None, inputs, outputs)?)
    }
}

/// Factory for [`PlusAgent`].
pub struct PlusFactory;

impl AgentFactory for PlusFactory {
    fn info(&self) -> AgentInfo {
        PlusAgent::info()
    }

    fn create(
        &self,
        topics: &TopicRegistry,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Arc<dyn Agent>> {
        Ok(PlusAgent::new(topics, None, inputs, outputs)?)
    }
}

/// Factory for [`BinaryOpAgent`] with a fixed operation.
pub struct BinaryOpFactory {
    operation: BinaryOperation,
}

impl BinaryOpFactory {
    /// Create a factory for `operation`.
    pub fn new(operation: BinaryOperation) -> Self {
        Self { operation }
    }
}

impl AgentFactory for BinaryOpFactory {
    fn info(&self) -> AgentInfo {
        BinaryOpAgent::info(self.operation)
    }

    fn create(
        &self,
        topics: &TopicRegistry,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Arc<dyn Agent>> {
        Ok(BinaryOpAgent::with_operation(
            topics,
            None,
            self.operation,
            inputs,
            outputs,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn instance_names_are_unique_per_type() {
        let topics = TopicRegistry::new();
        let a = PlusFactory
            .create(&topics, &names(&["A", "B"]), &names(&["C"]))
            .unwrap();
        let b = PlusFactory
            .create(&topics, &names(&["A", "B"]), &names(&["D"]))
            .unwrap();

        assert!(a.name().starts_with("plus#"));
        assert!(b.name().starts_with("plus#"));
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn binary_factory_reports_operation_type() {
        let factory = BinaryOpFactory::new(BinaryOperation::Mul);
        assert_eq!(factory.info().agent_type, "std::mul");
    }

    #[test]
    fn factory_arity_failure_leaves_topics_untouched() {
        let topics = TopicRegistry::new();
        let err = IncrementFactory
            .create(&topics, &[], &names(&["B"]))
            .err()
            .unwrap();

        assert_eq!(err.code(), "E101");
        assert!(topics.is_empty());
    }
}
