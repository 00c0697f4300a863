//! ConfigBuilder - turns a ConfigDefinition into live, wired agents.

use super::loader::{ConfigDefinition, LoaderError};
use rivulet_agents::AgentRegistry;
use rivulet_core::error::RivuletError;
use rivulet_core::registry::TopicRegistry;
use rivulet_core::traits::Agent;
use serde::Serialize;
use std::sync::Arc;

/// An agent record that could not be built.
#[derive(Debug, Clone)]
pub struct AgentFailure {
    /// Position of the record in the definition.
    pub index: usize,
    /// 1-based line number of the record.
    pub line: usize,
    /// Declared agent type.
    pub agent_type: String,
    /// Why construction failed.
    pub error: RivuletError,
}

/// Outcome of closing a set of agents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CloseReport {
    /// Number of agents closed.
    pub closed: usize,
    /// Errors reported by agents that could not fully detach.
    #[serde(serialize_with = "serialize_errors")]
    pub failures: Vec<RivuletError>,
}

impl CloseReport {
    /// Whether every agent detached cleanly.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

fn serialize_errors<S: serde::Serializer>(
    errors: &[RivuletError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

/// The agents built from one configuration.
#[derive(Default)]
pub struct LoadedConfig {
    /// Successfully built agents in declaration order.
    pub agents: Vec<Arc<dyn Agent>>,
    /// Records that failed to build.
    pub failures: Vec<AgentFailure>,
}

impl LoadedConfig {
    /// Number of live agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agent was built.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Names of the live agents in declaration order.
    pub fn agent_names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name().to_string()).collect()
    }

    /// Reset every agent in declaration order.
    pub fn reset_all(&self) {
        for agent in &self.agents {
            agent.reset();
        }
    }

    /// Close and release every agent.
    ///
    /// Continues past failures; each one is recorded in the report.
    pub fn close(&mut self) -> CloseReport {
        let mut report = CloseReport::default();
        for agent in self.agents.drain(..) {
            if let Err(e) = agent.close() {
                tracing::warn!(agent = %agent.name(), error = %e, "Agent cleanup failed");
                report.failures.push(e);
            }
            report.closed += 1;
        }
        report
    }
}

impl std::fmt::Debug for LoadedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedConfig")
            .field("agents", &self.agent_names())
            .field("failures", &self.failures)
            .finish()
    }
}

/// Builder that instantiates agents through an [`AgentRegistry`].
pub struct ConfigBuilder<'a> {
    topics: &'a TopicRegistry,
    agents: &'a AgentRegistry,
}

impl<'a> ConfigBuilder<'a> {
    /// Create a builder that wires agents into `topics`.
    pub fn new(topics: &'a TopicRegistry, agents: &'a AgentRegistry) -> Self {
        Self { topics, agents }
    }

    /// Build every record of `definition`.
    ///
    /// With `strict` set, the first failure closes the agents built so far
    /// and is returned as [`LoaderError::Agent`]. Otherwise failures are
    /// collected and the remaining records are still built.
    pub fn build(
        &self,
        definition: &ConfigDefinition,
        strict: bool,
    ) -> Result<LoadedConfig, LoaderError> {
        let mut loaded = LoadedConfig::default();

        for (index, record) in definition.agents.iter().enumerate() {
            match self.agents.create(
                &record.agent_type,
                self.topics,
                &record.inputs,
                &record.outputs,
            ) {
                Ok(agent) => {
                    tracing::debug!(
                        agent = %agent.name(),
                        agent_type = %record.agent_type,
                        line = record.line,
                        "Agent created"
                    );
                    loaded.agents.push(agent);
                }
                Err(error) if strict => {
                    loaded.close();
                    return Err(LoaderError::Agent {
                        line: record.line,
                        source: error,
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        agent_type = %record.agent_type,
                        line = record.line,
                        error = %error,
                        "Skipping agent"
                    );
                    loaded.failures.push(AgentFailure {
                        index,
                        line: record.line,
                        agent_type: record.agent_type.clone(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            agents = loaded.len(),
            failures = loaded.failures.len(),
            topics = self.topics.len(),
            "Configuration built"
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::ConfigLoader;
    use rivulet_agents::create_standard_registry;
    use rivulet_core::message::Message;

    #[test]
    fn close_detaches_every_agent() {
        let topics = TopicRegistry::new();
        let agents = create_standard_registry();
        let definition = ConfigLoader::parse("std::inc\nA\nB\nstd::add\nA,B\nC\n").unwrap();
        let mut loaded = ConfigBuilder::new(&topics, &agents)
            .build(&definition, false)
            .unwrap();

        let report = loaded.close();
        assert_eq!(report.closed, 2);
        assert!(report.is_clean());
        assert!(loaded.is_empty());

        topics.get("A").unwrap().publish(Message::from_number(1.0));
        assert!(topics.get("B").unwrap().last_message().is_none());
    }

    #[test]
    fn close_after_clear_reports_failures() {
        let topics = TopicRegistry::new();
        let agents = create_standard_registry();
        let definition = ConfigLoader::parse("std::inc\nA\nB\n").unwrap();
        let mut loaded = ConfigBuilder::new(&topics, &agents)
            .build(&definition, false)
            .unwrap();

        topics.clear();
        let report = loaded.close();

        assert_eq!(report.closed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].code(), "E301");

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["failures"][0].as_str().unwrap().contains("E301"));
    }

    #[test]
    fn names_are_unique() {
        let topics = TopicRegistry::new();
        let agents = create_standard_registry();
        let definition = ConfigLoader::parse("std::inc\nA\nB\nstd::inc\nB\nC\n").unwrap();
        let loaded = ConfigBuilder::new(&topics, &agents)
            .build(&definition, false)
            .unwrap();

        let names = loaded.agent_names();
        assert_eq!(names.len(), 2);
        assert_ne!(names[0], names[1]);
        assert!(format!("{loaded:?}").contains(&names[0]));
    }
}
