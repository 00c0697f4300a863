//! Core types for Rivulet.
//!
//! - `AgentId`: Process-unique identity of an agent instance

mod ids;

pub use ids::AgentId;
