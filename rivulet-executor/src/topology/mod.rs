//! Topology graph of topics and agents.
//!
//! A [`TopologyGraph`] is a disposable snapshot built from a
//! [`TopicRegistry`](rivulet_core::registry::TopicRegistry). Topics and agents
//! become nodes; subscriptions become `topic -> agent` edges and publisher
//! registrations become `agent -> topic` edges. Since publishing is
//! synchronous and recursive, a cycle in this graph means a single publish
//! can recurse without bound, so the engine refuses to activate cyclic
//! wirings.

mod graph;
mod snapshot;

pub use graph::{Edge, GraphNode, NodeKind, TopologyGraph};
pub use snapshot::{EdgeView, GraphSnapshot, NodeView};
