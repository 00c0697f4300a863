//! Serializable graph snapshots.

use super::graph::NodeKind;
use serde::{Deserialize, Serialize};

/// A node as exposed to API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    /// Node ID (`T<name>` or `A<name>`).
    pub id: String,
    /// Topic or agent name.
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Text of the topic's last message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// An edge as exposed to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeView {
    /// Source node ID.
    pub from: String,
    /// Target node ID.
    pub to: String,
}

/// A point-in-time view of the topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// All nodes.
    pub nodes: Vec<NodeView>,
    /// All edges.
    pub edges: Vec<EdgeView>,
    /// Whether the topology is free of cycles.
    pub acyclic: bool,
}

impl GraphSnapshot {
    /// Render the snapshot in Graphviz DOT format.
    ///
    /// Topics are drawn as boxes and agents as ellipses; topics with a value
    /// show it under their name.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph rivulet {\n    rankdir=LR;\n");
        for node in &self.nodes {
            let shape = match node.kind {
                NodeKind::Topic => "box",
                NodeKind::Agent => "ellipse",
            };
            let label = match &node.value {
                Some(value) => format!("{}\\n{}", escape(&node.name), escape(value)),
                None => escape(&node.name),
            };
            out.push_str(&format!(
                "    \"{}\" [shape={}, label=\"{}\"];\n",
                escape(&node.id),
                shape,
                label
            ));
        }
        for edge in &self.edges {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                escape(&edge.from),
                escape(&edge.to)
            ));
        }
        out.push_str("}\n");
        out
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
