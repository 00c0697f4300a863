//! Prelude for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! # Example
//!
//! ```
//! use rivulet_core::prelude::*;
//! ```

// Core types
pub use crate::message::Message;
pub use crate::types::AgentId;

// Error handling
pub use crate::error::{Result, RivuletError};

// Topics
pub use crate::registry::TopicRegistry;
pub use crate::topic::Topic;

// Traits
pub use crate::traits::{Agent, AgentFactory, AgentInfo};

// Agent construction
pub use crate::wiring::Wiring;
