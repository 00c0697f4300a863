//! Engine implementation.

use crate::loader::{
    CloseReport, ConfigDefinition, ConfigLoader, LoadedConfig, LoaderConfig, LoaderError,
};
use crate::topology::{GraphSnapshot, TopologyGraph};
use parking_lot::RwLock;
use rivulet_agents::{AgentRegistry, create_standard_registry};
use rivulet_core::error::{Result, RivuletError};
use rivulet_core::message::Message;
use rivulet_core::registry::TopicRegistry;
use serde::Serialize;
use std::sync::Arc;

/// A topic as exposed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicView {
    /// Topic name.
    pub name: String,
    /// Text of the last message, if any.
    pub last_value: Option<String>,
    /// Numeric view of the last message, if any.
    pub last_number: Option<f64>,
    /// Subscribed agent names in subscription order.
    pub subscribers: Vec<String>,
    /// Publishing agent names in registration order.
    pub publishers: Vec<String>,
}

/// An agent record that was skipped during a load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureView {
    /// 1-based line number of the record.
    pub line: usize,
    /// Declared agent type.
    pub agent_type: String,
    /// Error code.
    pub code: &'static str,
    /// Error message.
    pub error: String,
}

/// Summary of a successful [`Engine::load_config`].
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    /// Names of the agents now active.
    pub agents: Vec<String>,
    /// Records that could not be built.
    pub failures: Vec<FailureView>,
    /// Number of topics in the registry after the load.
    pub topics: usize,
    /// Outcome of closing the previous configuration.
    pub replaced: CloseReport,
}

#[derive(Default)]
struct Active {
    loaded: LoadedConfig,
    definition: ConfigDefinition,
    /// Set when a cyclic wiring was activated with the cycle check off.
    cyclic: bool,
}

/// Owns one running dataflow.
///
/// Publishing and inspection take a shared lock on the active
/// configuration; loading and shutdown take it exclusively, so a publish
/// never observes a half-built wiring.
pub struct Engine {
    topics: Arc<TopicRegistry>,
    agents: AgentRegistry,
    loader: ConfigLoader,
    active: RwLock<Active>,
}

impl Engine {
    /// Create an engine with the standard agent types and default loader
    /// settings.
    pub fn new() -> Self {
        Self::with_registry(create_standard_registry())
    }

    /// Create an engine that builds agents from `agents`.
    pub fn with_registry(agents: AgentRegistry) -> Self {
        Self {
            topics: Arc::new(TopicRegistry::new()),
            agents,
            loader: ConfigLoader::new(),
            active: RwLock::new(Active::default()),
        }
    }

    /// Replace the loader settings.
    pub fn with_loader_config(mut self, config: LoaderConfig) -> Self {
        self.loader = ConfigLoader::with_config(config);
        self
    }

    /// The topic registry shared by every agent of this engine.
    pub fn topic_registry(&self) -> &Arc<TopicRegistry> {
        &self.topics
    }

    /// The registered agent factories.
    pub fn agent_registry(&self) -> &AgentRegistry {
        &self.agents
    }

    /// Parse `text` and activate it, replacing the current configuration.
    ///
    /// A parse error leaves the current configuration running. Otherwise
    /// the previous agents are closed and the registry is cleared before
    /// the new agents are built.
    ///
    /// # Errors
    /// - [`RivuletError::ConfigParse`] for malformed text.
    /// - [`RivuletError::CyclicTopology`] if the new wiring has a cycle. The
    ///   engine is left empty.
    /// - The first agent error when the loader is strict.
    pub fn load_config(&self, text: &str) -> Result<LoadReport> {
        let definition = ConfigLoader::parse(text)?;
        self.activate(definition)
    }

    /// Activate an already parsed configuration.
    ///
    /// # Errors
    /// See [`Engine::load_config`].
    pub fn activate(&self, definition: ConfigDefinition) -> Result<LoadReport> {
        let mut active = self.active.write();

        let replaced = active.loaded.close();
        self.topics.clear();
        active.definition = ConfigDefinition::default();
        active.cyclic = false;

        let loaded = match self.loader.build(&definition, &self.topics, &self.agents) {
            Ok(loaded) => loaded,
            Err(err) => {
                self.topics.clear();
                if let LoaderError::Cyclic { cycle, .. } = &err {
                    tracing::warn!(cycle = %cycle.join(" -> "), "Configuration rejected");
                }
                return Err(err.into());
            }
        };

        let report = LoadReport {
            agents: loaded.agent_names(),
            failures: loaded
                .failures
                .iter()
                .map(|f| FailureView {
                    line: f.line,
                    agent_type: f.agent_type.clone(),
                    code: f.error.code(),
                    error: f.error.to_string(),
                })
                .collect(),
            topics: self.topics.len(),
            replaced,
        };

        tracing::info!(
            agents = report.agents.len(),
            failures = report.failures.len(),
            topics = report.topics,
            "Configuration activated"
        );

        // The loader only guarantees acyclicity when it checked for it.
        let cyclic = !self.loader.config().check_cycles
            && TopologyGraph::from_registry(&self.topics).has_cycles();
        if cyclic {
            tracing::warn!("Cyclic configuration activated; publishing is disabled");
        }

        active.loaded = loaded;
        active.definition = definition;
        active.cyclic = cyclic;
        Ok(report)
    }

    /// Publish `value` on the topic called `topic`, creating the topic if
    /// needed. Returns the number of direct subscribers invoked.
    ///
    /// # Errors
    /// - [`RivuletError::InvalidArgument`] if `topic` is empty.
    /// - [`RivuletError::CyclicTopology`] if the active wiring has a cycle.
    ///   Publishing into it would recurse without bound.
    pub fn publish(&self, topic: &str, value: &str) -> Result<usize> {
        let active = self.active.read();
        self.ensure_acyclic(&active)?;
        let topic = self.topics.get(topic)?;
        tracing::debug!(topic = %topic.name(), value = %value, "Publishing");
        Ok(topic.publish(Message::from_text(value)))
    }

    /// Every topic with its last value and wiring, sorted by name.
    pub fn topics(&self) -> Vec<TopicView> {
        let _active = self.active.read();
        self.topics
            .topics()
            .iter()
            .map(|topic| {
                let last = topic.last_message();
                TopicView {
                    name: topic.name().to_string(),
                    last_value: last.as_ref().map(|m| m.as_text().to_string()),
                    last_number: last.as_ref().map(|m| m.as_number()),
                    subscribers: topic
                        .subscribers()
                        .iter()
                        .map(|a| a.name().to_string())
                        .collect(),
                    publishers: topic
                        .publishers()
                        .iter()
                        .map(|a| a.name().to_string())
                        .collect(),
                }
            })
            .collect()
    }

    /// The current topology graph.
    pub fn graph(&self) -> TopologyGraph {
        let _active = self.active.read();
        TopologyGraph::from_registry(&self.topics)
    }

    /// Serializable snapshot of the current topology.
    pub fn snapshot(&self) -> GraphSnapshot {
        self.graph().snapshot()
    }

    /// Whether the current topology is free of cycles.
    pub fn is_acyclic(&self) -> bool {
        !self.graph().has_cycles()
    }

    /// Names of the active agents in declaration order.
    pub fn agent_names(&self) -> Vec<String> {
        self.active.read().loaded.agent_names()
    }

    /// The definition of the active configuration.
    pub fn definition(&self) -> ConfigDefinition {
        self.active.read().definition.clone()
    }

    /// Reset every active agent. Returns how many were reset.
    ///
    /// # Errors
    /// [`RivuletError::CyclicTopology`] if the active wiring has a cycle,
    /// since binary agents publish when reset.
    pub fn reset_all(&self) -> Result<usize> {
        let active = self.active.read();
        self.ensure_acyclic(&active)?;
        active.loaded.reset_all();
        tracing::info!(agents = active.loaded.len(), "Agents reset");
        Ok(active.loaded.len())
    }

    fn ensure_acyclic(&self, active: &Active) -> Result<()> {
        if active.cyclic {
            return Err(RivuletError::CyclicTopology {
                agents: active.loaded.len(),
                topics: self.topics.len(),
            });
        }
        Ok(())
    }

    /// Close every agent and clear the registry.
    pub fn shutdown(&self) -> CloseReport {
        let mut active = self.active.write();
        let report = active.loaded.close();
        active.definition = ConfigDefinition::default();
        active.cyclic = false;
        self.topics.clear();
        tracing::info!(
            closed = report.closed,
            failures = report.failures.len(),
            "Engine shut down"
        );
        report
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("topics", &self.topics.len())
            .field("agents", &self.agent_names())
            .finish()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        let report = self.active.get_mut().loaded.close();
        if !report.is_clean() {
            tracing::warn!(failures = report.failures.len(), "Unclean engine drop");
        }
    }
}
