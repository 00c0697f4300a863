//! ConfigLoader - parses configuration text and builds wirings.

use super::builder::{ConfigBuilder, LoadedConfig};
use crate::topology::{NodeKind, TopologyGraph};
use rivulet_agents::AgentRegistry;
use rivulet_core::error::RivuletError;
use rivulet_core::registry::TopicRegistry;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Configuration for the loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Whether to reject wirings whose topology contains a cycle.
    ///
    /// See [`LoaderConfig::lenient`] before turning this off.
    pub check_cycles: bool,
    /// Whether a single failing agent aborts the whole load.
    pub strict: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            check_cycles: true,
            strict: false,
        }
    }
}

impl LoaderConfig {
    /// Create a lenient config (no cycle check, failures collected).
    ///
    /// Meant for inspecting wirings. A cyclic wiring built this way recurses
    /// without bound on the first publish into the cycle, so
    /// [`Engine`](crate::engine::Engine) refuses to publish into it. Agents
    /// driven directly through their topics get no such guard.
    pub fn lenient() -> Self {
        Self {
            check_cycles: false,
            strict: false,
        }
    }

    /// Create a strict config (cycle check, abort on first failure).
    pub fn strict() -> Self {
        Self {
            check_cycles: true,
            strict: true,
        }
    }
}

/// One agent record of a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDefinition {
    /// Agent type identifier (e.g., "std::plus").
    #[serde(rename = "type")]
    pub agent_type: String,
    /// Input topic names.
    pub inputs: Vec<String>,
    /// Output topic names.
    pub outputs: Vec<String>,
    /// 1-based line number of the record's type line.
    pub line: usize,
}

/// A parsed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDefinition {
    /// Agent records in declaration order.
    pub agents: Vec<AgentDefinition>,
}

impl ConfigDefinition {
    /// Number of agent records.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the configuration declares no agents.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Render back to configuration text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for agent in &self.agents {
            let _ = writeln!(out, "{}", agent.agent_type);
            let _ = writeln!(out, "{}", agent.inputs.join(","));
            let _ = writeln!(out, "{}", agent.outputs.join(","));
        }
        out
    }
}

/// Error during configuration loading.
#[derive(Debug)]
pub enum LoaderError {
    /// I/O error reading file.
    Io {
        /// The file path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
    /// Syntax error in the configuration text.
    Parse {
        /// The file path being parsed, if available.
        path: Option<PathBuf>,
        /// The underlying parse error.
        source: RivuletError,
    },
    /// An agent could not be built (strict mode only).
    Agent {
        /// 1-based line number of the failing record.
        line: usize,
        /// The underlying construction error.
        source: RivuletError,
    },
    /// The wiring contains a cycle.
    Cyclic {
        /// Node IDs along one cycle.
        cycle: Vec<String>,
        /// Number of agents in the rejected wiring.
        agents: usize,
        /// Number of topics in the rejected wiring.
        topics: usize,
    },
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read '{}': {}", path.display(), source)
            }
            Self::Parse {
                path: Some(path),
                source,
            } => {
                write!(f, "failed to parse '{}': {}", path.display(), source)
            }
            Self::Parse { path: None, source } => {
                write!(f, "failed to parse configuration: {}", source)
            }
            Self::Agent { line, source } => {
                write!(f, "agent at line {} failed: {}", line, source)
            }
            Self::Cyclic { cycle, .. } => {
                write!(f, "topology contains a cycle: {}", cycle.join(" -> "))
            }
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Agent { source, .. } => Some(source),
            Self::Cyclic { .. } => None,
        }
    }
}

impl From<LoaderError> for RivuletError {
    fn from(err: LoaderError) -> Self {
        match err {
            LoaderError::Io { path, source } => RivuletError::Io {
                path,
                cause: source.to_string(),
            },
            LoaderError::Parse { source, .. } | LoaderError::Agent { source, .. } => source,
            LoaderError::Cyclic { agents, topics, .. } => {
                RivuletError::CyclicTopology { agents, topics }
            }
        }
    }
}

/// Loader that handles parsing, building and topology checks.
pub struct ConfigLoader {
    /// The configuration controlling loader behavior.
    config: LoaderConfig,
}

impl ConfigLoader {
    /// Create a new loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// The loader's configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Parse configuration text.
    pub fn parse(text: &str) -> Result<ConfigDefinition, LoaderError> {
        parse_records(text).map_err(|source| LoaderError::Parse { path: None, source })
    }

    /// Read and parse a configuration file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<ConfigDefinition, LoaderError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| LoaderError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        parse_records(&content).map_err(|source| LoaderError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })
    }

    /// Build every agent of `definition` into `topics`.
    ///
    /// In lenient mode failing agents are collected in
    /// [`LoadedConfig::failures`] and the others are still built. When cycle
    /// checking is enabled a cyclic wiring is closed again and rejected.
    pub fn build(
        &self,
        definition: &ConfigDefinition,
        topics: &TopicRegistry,
        agents: &AgentRegistry,
    ) -> Result<LoadedConfig, LoaderError> {
        let mut loaded =
            ConfigBuilder::new(topics, agents).build(definition, self.config.strict)?;

        if self.config.check_cycles {
            let graph = TopologyGraph::from_registry(topics);
            if let Some(cycle) = graph.find_cycle() {
                let report = loaded.close();
                tracing::warn!(
                    cycle = %cycle.join(" -> "),
                    closed = report.closed,
                    "Rejecting cyclic topology"
                );
                return Err(LoaderError::Cyclic {
                    cycle,
                    agents: graph.count(NodeKind::Agent),
                    topics: graph.count(NodeKind::Topic),
                });
            }
        }

        Ok(loaded)
    }

    /// Parse `text` and build it into `topics`.
    pub fn load(
        &self,
        text: &str,
        topics: &TopicRegistry,
        agents: &AgentRegistry,
    ) -> Result<LoadedConfig, LoaderError> {
        let definition = Self::parse(text)?;
        self.build(&definition, topics, agents)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_records(text: &str) -> Result<ConfigDefinition, RivuletError> {
    let mut agents = Vec::new();
    let mut pending: Vec<(usize, &str)> = Vec::with_capacity(3);

    let lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    for (number, line) in lines {
        pending.push((number, line));
        if pending.len() == 3 {
            let (line, agent_type) = pending[0];
            agents.push(AgentDefinition {
                agent_type: agent_type.to_string(),
                inputs: split_names(pending[1].1),
                outputs: split_names(pending[2].1),
                line,
            });
            pending.clear();
        }
    }

    if let Some(&(line, _)) = pending.first() {
        return Err(RivuletError::ConfigParse {
            line,
            cause: format!(
                "incomplete agent record: expected 3 lines, found {}",
                pending.len()
            ),
        });
    }

    Ok(ConfigDefinition { agents })
}

fn split_names(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivulet_agents::create_standard_registry;

    const SUM_CONFIG: &str = r#"
# Two increments feeding a sum.
std::inc
A
B

std::inc
C
D

std::plus
B, D
E
"#;

    const CYCLIC_CONFIG: &str = r#"
std::inc
A
B
std::inc
B
A
"#;

    #[test]
    fn parse_records_with_comments_and_blanks() {
        let definition = ConfigLoader::parse(SUM_CONFIG).unwrap();

        assert_eq!(definition.len(), 3);
        assert_eq!(definition.agents[2].agent_type, "std::plus");
        assert_eq!(definition.agents[2].inputs, vec!["B", "D"]);
        assert_eq!(definition.agents[2].outputs, vec!["E"]);
        assert_eq!(definition.agents[0].line, 3);
        assert_eq!(definition.agents[2].line, 11);
    }

    #[test]
    fn empty_names_are_dropped() {
        let definition = ConfigLoader::parse("std::plus\nA,,B,\nC\n").unwrap();
        assert_eq!(definition.agents[0].inputs, vec!["A", "B"]);
    }

    #[test]
    fn partial_record_is_an_error() {
        let err = ConfigLoader::parse("std::inc\nA\nB\nstd::plus\nA,B\n").unwrap_err();

        let err: RivuletError = err.into();
        assert_eq!(
            err,
            RivuletError::ConfigParse {
                line: 4,
                cause: "incomplete agent record: expected 3 lines, found 2".to_string(),
            }
        );
    }

    #[test]
    fn empty_text_is_an_empty_config() {
        assert!(ConfigLoader::parse("").unwrap().is_empty());
        assert!(ConfigLoader::parse("# nothing\n\n").unwrap().is_empty());
    }

    #[test]
    fn to_text_parses_back() {
        let definition = ConfigLoader::parse(SUM_CONFIG).unwrap();
        let reparsed = ConfigLoader::parse(&definition.to_text()).unwrap();

        let strip = |d: &ConfigDefinition| {
            d.agents
                .iter()
                .map(|a| (a.agent_type.clone(), a.inputs.clone(), a.outputs.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(&definition), strip(&reparsed));
    }

    #[test]
    fn build_wires_agents() {
        let topics = TopicRegistry::new();
        let agents = create_standard_registry();
        let loaded = ConfigLoader::new().load(SUM_CONFIG, &topics, &agents).unwrap();

        assert_eq!(loaded.len(), 3);
        assert!(loaded.failures.is_empty());

        topics
            .get("A")
            .unwrap()
            .publish(rivulet_core::message::Message::from_number(1.0));
        topics
            .get("C")
            .unwrap()
            .publish(rivulet_core::message::Message::from_number(2.0));
        assert_eq!(topics.get("E").unwrap().last_number(), Some(5.0));
    }

    #[test]
    fn lenient_build_collects_failures() {
        let topics = TopicRegistry::new();
        let agents = create_standard_registry();
        let text = "std::nope\nA\nB\nstd::plus\nA\nC\nstd::inc\nA\nB\n";
        let loaded = ConfigLoader::new().load(text, &topics, &agents).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.failures.len(), 2);
        assert_eq!(loaded.failures[0].line, 1);
        assert_eq!(loaded.failures[0].error.code(), "E102");
        assert_eq!(loaded.failures[1].error.code(), "E101");
    }

    #[test]
    fn strict_build_aborts_and_unwires() {
        let topics = TopicRegistry::new();
        let agents = create_standard_registry();
        let text = "std::inc\nA\nB\nstd::nope\nB\nC\n";
        let err = ConfigLoader::with_config(LoaderConfig::strict())
            .load(text, &topics, &agents)
            .unwrap_err();

        assert!(matches!(err, LoaderError::Agent { line: 4, .. }));
        assert_eq!(topics.get("A").unwrap().subscriber_count(), 0);
    }

    #[test]
    fn cyclic_wiring_is_rejected_and_closed() {
        let topics = TopicRegistry::new();
        let agents = create_standard_registry();
        let err = ConfigLoader::new()
            .load(CYCLIC_CONFIG, &topics, &agents)
            .unwrap_err();

        match err {
            LoaderError::Cyclic {
                cycle,
                agents,
                topics: topic_count,
            } => {
                assert_eq!(agents, 2);
                assert_eq!(topic_count, 2);
                assert_eq!(cycle.first(), cycle.last());
            }
            other => panic!("expected cycle error, got {other}"),
        }
        assert_eq!(topics.get("A").unwrap().subscriber_count(), 0);
        assert_eq!(topics.get("B").unwrap().subscriber_count(), 0);
    }

    #[test]
    fn cycle_check_can_be_disabled() {
        let topics = TopicRegistry::new();
        let agents = create_standard_registry();
        let loaded = ConfigLoader::with_config(LoaderConfig::lenient())
            .load(CYCLIC_CONFIG, &topics, &agents)
            .unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn load_file_reports_missing_path() {
        let err = ConfigLoader::load_file("/definitely/not/here.conf").unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
        assert_eq!(RivuletError::from(err).code(), "E901");
    }
}
