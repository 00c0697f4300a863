//! Standard library agents for Rivulet.
//!
//! This crate provides the built-in agents and the registry that maps type
//! identifiers to the factories that build them:
//!
//! ## Numeric agents (`math::*`)
//! - [`math::IncrementAgent`] - Publishes its input plus one
//! - [`math::PlusAgent`] - Sums the last values seen on two inputs
//! - [`math::BinaryOpAgent`] - Applies a binary function to two input topics
//!
//! ## Registry (`registry::*`)
//! - [`registry::AgentRegistry`] - Type identifier to factory map
//! - [`registry::create_standard_registry`] - Registry of all built-in types

pub mod math;
pub mod registry;

// Agent exports
pub use math::{
    BinaryFn, BinaryOpAgent, BinaryOpFactory, BinaryOperation, IncrementAgent, IncrementFactory,
    PlusAgent, PlusFactory,
};

// Registry exports
pub use registry::{AgentRegistry, create_standard_registry};

/// Prelude for commonly used types.
pub mod prelude {
    pub use crate::math::{BinaryOpAgent, BinaryOperation, IncrementAgent, PlusAgent};
    pub use crate::registry::{AgentRegistry, create_standard_registry};
}
