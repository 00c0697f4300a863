//! Core traits for Rivulet components.
//!
//! - `Agent`: A computational unit wired between topics
//! - `AgentFactory`: Builds agents of one type from a wiring declaration

mod agent;

pub use agent::{Agent, AgentFactory, AgentInfo};
