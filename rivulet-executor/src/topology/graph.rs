//! Topology graph representation and analysis.

use super::snapshot::{EdgeView, GraphSnapshot, NodeView};
use rivulet_core::registry::TopicRegistry;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A topic.
    Topic,
    /// An agent.
    Agent,
}

impl NodeKind {
    fn prefix(self) -> char {
        match self {
            Self::Topic => 'T',
            Self::Agent => 'A',
        }
    }
}

/// A directed edge between two node IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Source node ID.
    pub from: String,
    /// Target node ID.
    pub to: String,
}

/// Information about a node in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    /// Node ID: `T<name>` for topics, `A<name>` for agents.
    pub id: String,
    /// Topic or agent name.
    pub name: String,
    /// Node kind.
    pub kind: NodeKind,
    /// Text of the topic's last message, if any.
    pub value: Option<String>,
}

impl GraphNode {
    /// Create a new graph node.
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: node_id(kind, &name),
            name,
            kind,
            value: None,
        }
    }

    /// Attach a displayed value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Build the node ID for a topic or agent name.
pub fn node_id(kind: NodeKind, name: &str) -> String {
    format!("{}{}", kind.prefix(), name)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// The topology graph.
///
/// Nodes keep insertion order; [`TopologyGraph::from_registry`] inserts
/// topics by name and agents in the order they are first met.
#[derive(Debug, Default)]
pub struct TopologyGraph {
    /// Nodes in insertion order.
    nodes: Vec<GraphNode>,
    /// Node index by node ID.
    index: HashMap<String, usize>,
    /// All edges, deduplicated.
    edges: Vec<Edge>,
    /// Outgoing adjacency by node index.
    outgoing: Vec<Vec<usize>>,
    /// Edge set used for deduplication.
    edge_set: HashSet<(usize, usize)>,
}

impl TopologyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from the current state of a topic registry.
    ///
    /// Agents are identified by name: two agents sharing a name collapse
    /// into one node.
    pub fn from_registry(topics: &TopicRegistry) -> Self {
        let mut graph = Self::new();

        for topic in topics.topics() {
            let mut node = GraphNode::new(NodeKind::Topic, topic.name());
            if let Some(message) = topic.last_message() {
                node = node.with_value(message.as_text());
            }
            let topic_id = graph.add_node(node);

            for subscriber in topic.subscribers() {
                let agent_id = graph.add_node(GraphNode::new(NodeKind::Agent, subscriber.name()));
                graph.add_edge(&topic_id, &agent_id);
            }
            for publisher in topic.publishers() {
                let agent_id = graph.add_node(GraphNode::new(NodeKind::Agent, publisher.name()));
                graph.add_edge(&agent_id, &topic_id);
            }
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built topology graph"
        );
        graph
    }

    /// Add a node, returning its ID. An existing node with the same ID is kept.
    pub fn add_node(&mut self, node: GraphNode) -> String {
        let id = node.id.clone();
        if !self.index.contains_key(&id) {
            self.index.insert(id.clone(), self.nodes.len());
            self.nodes.push(node);
            self.outgoing.push(Vec::new());
        }
        id
    }

    /// Add an edge between two existing nodes.
    ///
    /// Returns `false` if either node is missing or the edge already exists.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&a), Some(&b)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        if !self.edge_set.insert((a, b)) {
            return false;
        }
        self.outgoing[a].push(b);
        self.edges.push(Edge {
            from: from.to_string(),
            to: to.to_string(),
        });
        true
    }

    /// Get a node by ID.
    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of nodes of one kind.
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    /// IDs of the direct successors of a node.
    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.index
            .get(id)
            .map(|&i| {
                self.outgoing[i]
                    .iter()
                    .map(|&j| self.nodes[j].id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether the graph contains a directed cycle.
    pub fn has_cycles(&self) -> bool {
        self.find_cycle().is_some()
    }

    /// Find one directed cycle, returned as node IDs along the cycle.
    ///
    /// Three-color depth-first search: every unvisited node starts its own
    /// search, and an edge into a node that is still in progress closes a
    /// cycle. The search keeps an explicit stack of `(node, next edge)`
    /// frames, so graph depth is not limited by the native stack.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut color = vec![Color::White; self.nodes.len()];
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..self.nodes.len() {
            if color[root] != Color::White {
                continue;
            }
            color[root] = Color::Gray;
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                if let Some(&succ) = self.outgoing[node].get(next) {
                    frame.1 += 1;
                    match color[succ] {
                        Color::White => {
                            color[succ] = Color::Gray;
                            stack.push((succ, 0));
                        }
                        Color::Gray => {
                            let start = stack.iter().position(|&(n, _)| n == succ).unwrap_or(0);
                            let mut cycle: Vec<String> = stack[start..]
                                .iter()
                                .map(|&(n, _)| self.nodes[n].id.clone())
                                .collect();
                            cycle.push(self.nodes[succ].id.clone());
                            return Some(cycle);
                        }
                        Color::Black => {}
                    }
                } else {
                    color[node] = Color::Black;
                    stack.pop();
                }
            }
        }
        None
    }

    /// Order nodes so that every edge points forward, using Kahn's algorithm.
    ///
    /// Returns `None` if the graph is cyclic.
    pub fn topological_order(&self) -> Option<Vec<&GraphNode>> {
        let mut in_degree = vec![0usize; self.nodes.len()];
        for targets in &self.outgoing {
            for &t in targets {
                in_degree[t] += 1;
            }
        }

        let mut queue: VecDeque<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, degree)| *degree == 0)
            .map(|(i, _)| i)
            .collect();

        let mut sorted = Vec::with_capacity(self.nodes.len());
        while let Some(node) = queue.pop_front() {
            sorted.push(&self.nodes[node]);
            for &succ in &self.outgoing[node] {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    queue.push_back(succ);
                }
            }
        }

        (sorted.len() == self.nodes.len()).then_some(sorted)
    }

    /// Serializable view of the graph.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeView {
                    id: n.id.clone(),
                    name: n.name.clone(),
                    kind: n.kind,
                    value: n.value.clone(),
                })
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| EdgeView {
                    from: e.from.clone(),
                    to: e.to.clone(),
                })
                .collect(),
            acyclic: !self.has_cycles(),
        }
    }
}
