//! Rivulet Core Library
//!
//! This crate provides the building blocks of a Rivulet dataflow: immutable
//! messages, named broadcast topics, the topic registry, and the agent trait
//! that computational units implement.
//!
//! # Overview
//!
//! A Rivulet program is a graph of topics connected by agents. Agents
//! subscribe to some topics and publish derived values to others. Publishing
//! is synchronous: every subscriber runs on the publishing thread before
//! [`Topic::publish`] returns, and may publish further on the same stack.
//!
//! # Key Components
//!
//! - **Message**: Immutable value with raw, text and numeric views
//! - **Topic**: Named channel with subscriber/publisher sets and the last message
//! - **TopicRegistry**: Get-or-create directory of topics
//! - **Agent**: Trait implemented by every computational unit
//! - **Wiring**: Shared resolve/attach/detach logic for agent implementations
//!
//! # Example
//!
//! ```
//! use rivulet_core::prelude::*;
//!
//! let topics = TopicRegistry::new();
//! let a = topics.get("A")?;
//! a.publish(Message::from_number(3.0));
//!
//! assert_eq!(a.last_number(), Some(3.0));
//! # Ok::<(), RivuletError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod message;
pub mod prelude;
pub mod registry;
pub mod testing;
pub mod topic;
pub mod traits;
pub mod types;
pub mod wiring;

// Re-export key types at crate root for convenience
pub use error::{Result, RivuletError};
pub use message::Message;
pub use registry::TopicRegistry;
pub use topic::Topic;
pub use traits::{Agent, AgentFactory, AgentInfo};
pub use types::AgentId;
pub use wiring::Wiring;
