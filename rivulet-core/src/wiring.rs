//! Resolution and self-wiring of agent topics.
//!
//! Every built-in agent follows the same construction contract:
//!
//! 1. [`Wiring::resolve`] checks arity and resolves all topic names through
//!    the registry. Nothing is subscribed yet, so a failure leaves no trace.
//! 2. The agent is allocated behind an `Arc`.
//! 3. [`Wiring::attach`] subscribes it to its inputs and records it as a
//!    publisher on its outputs.
//!
//! [`Wiring::detach`] undoes step 3 and is safe to call more than once.

use crate::error::{Result, RivuletError};
use crate::message::Message;
use crate::registry::TopicRegistry;
use crate::topic::Topic;
use crate::traits::{Agent, AgentInfo};
use crate::types::AgentId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

#[derive(Debug)]
struct TopicRef {
    name: String,
    topic: Weak<Topic>,
}

impl TopicRef {
    fn upgrade(&self) -> Option<Arc<Topic>> {
        self.topic.upgrade()
    }
}

/// The resolved input and output topics of one agent.
#[derive(Debug)]
pub struct Wiring {
    inputs: Vec<TopicRef>,
    outputs: Vec<TopicRef>,
    closed: AtomicBool,
}

impl Wiring {
    /// Validate arity and resolve topic names for an agent described by `info`.
    ///
    /// Only the first `info.min_inputs()` inputs and `info.min_outputs()`
    /// outputs are used; extra names are ignored.
    ///
    /// # Errors
    /// Returns [`RivuletError::Configuration`] if too few names are given or a
    /// name cannot be resolved to a topic.
    pub fn resolve(
        topics: &TopicRegistry,
        info: &AgentInfo,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Self> {
        check_arity(info, "input", info.min_inputs(), inputs.len())?;
        check_arity(info, "output", info.min_outputs(), outputs.len())?;

        if inputs.len() > info.min_inputs() || outputs.len() > info.min_outputs() {
            tracing::debug!(
                agent_type = %info.agent_type,
                inputs = inputs.len(),
                outputs = outputs.len(),
                "Ignoring extra topic names"
            );
        }

        let inputs = resolve_all(topics, info, "input", &inputs[..info.min_inputs()])?;
        let outputs = resolve_all(topics, info, "output", &outputs[..info.min_outputs()])?;

        Ok(Self {
            inputs,
            outputs,
            closed: AtomicBool::new(false),
        })
    }

    /// Subscribe `agent` to every input and register it on every output.
    pub fn attach(&self, agent: Arc<dyn Agent>) {
        for input in &self.inputs {
            if let Some(topic) = input.upgrade() {
                topic.subscribe(Arc::clone(&agent));
            }
        }
        for output in &self.outputs {
            if let Some(topic) = output.upgrade() {
                topic.add_publisher(Arc::clone(&agent));
            }
        }
        tracing::debug!(
            agent = %agent.name(),
            inputs = ?self.input_names(),
            outputs = ?self.output_names(),
            "Agent wired"
        );
    }

    /// Undo [`Wiring::attach`].
    ///
    /// # Errors
    /// Returns [`RivuletError::CleanupFailed`] listing the topics that no
    /// longer exist. All reachable topics are detached regardless.
    pub fn detach(&self, agent: AgentId, agent_name: &str) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let mut unreachable = Vec::new();
        for input in &self.inputs {
            match input.upgrade() {
                Some(topic) => {
                    topic.unsubscribe(agent);
                }
                None => unreachable.push(input.name.clone()),
            }
        }
        for output in &self.outputs {
            match output.upgrade() {
                Some(topic) => {
                    topic.remove_publisher(agent);
                }
                None => unreachable.push(output.name.clone()),
            }
        }

        if unreachable.is_empty() {
            tracing::debug!(agent = %agent_name, "Agent detached");
            Ok(())
        } else {
            tracing::warn!(agent = %agent_name, topics = ?unreachable, "Agent detached partially");
            Err(RivuletError::CleanupFailed {
                agent: agent_name.to_string(),
                topics: unreachable,
            })
        }
    }

    /// Whether [`Wiring::detach`] has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// The input topic at `index`, if it still exists.
    pub fn input(&self, index: usize) -> Option<Arc<Topic>> {
        self.inputs.get(index).and_then(TopicRef::upgrade)
    }

    /// The output topic at `index`, if it still exists.
    pub fn output(&self, index: usize) -> Option<Arc<Topic>> {
        self.outputs.get(index).and_then(TopicRef::upgrade)
    }

    /// Position of the first input named `topic`.
    pub fn input_index(&self, topic: &str) -> Option<usize> {
        self.inputs.iter().position(|t| t.name == topic)
    }

    /// Names of the input topics in declaration order.
    pub fn input_names(&self) -> Vec<&str> {
        self.inputs.iter().map(|t| t.name.as_str()).collect()
    }

    /// Names of the output topics in declaration order.
    pub fn output_names(&self) -> Vec<&str> {
        self.outputs.iter().map(|t| t.name.as_str()).collect()
    }

    /// Publish `message` on the output at `index`.
    ///
    /// Returns `false` if the output topic no longer exists.
    pub fn publish(&self, index: usize, message: Message) -> bool {
        match self.output(index) {
            Some(topic) => {
                topic.publish(message);
                true
            }
            None => {
                tracing::debug!(index, "Output topic is gone; dropping message");
                false
            }
        }
    }
}

fn check_arity(info: &AgentInfo, kind: &str, required: usize, actual: usize) -> Result<()> {
    if actual < required {
        return Err(RivuletError::configuration(
            &info.agent_type,
            format!(
                "requires at least {} {}{}, got {}",
                required,
                kind,
                if required == 1 { "" } else { "s" },
                actual
            ),
        ));
    }
    Ok(())
}

fn resolve_all(
    topics: &TopicRegistry,
    info: &AgentInfo,
    kind: &str,
    names: &[String],
) -> Result<Vec<TopicRef>> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let topic = topics.get(name).map_err(|e| {
                RivuletError::configuration(
                    &info.agent_type,
                    format!("unresolved {} topic #{}: {}", kind, i + 1, e),
                )
            })?;
            Ok(TopicRef {
                name: name.clone(),
                topic: Arc::downgrade(&topic),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingAgent;

    fn info() -> AgentInfo {
        AgentInfo::new("test", "pair")
            .with_inputs(&["x", "y"])
            .with_outputs(&["out"])
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn too_few_inputs_fail() {
        let topics = TopicRegistry::new();
        let err = Wiring::resolve(&topics, &info(), &names(&["A"]), &names(&["B"])).unwrap_err();

        assert_eq!(err.code(), "E101");
        assert!(err.to_string().contains("at least 2 inputs"));
        assert!(topics.is_empty());
    }

    #[test]
    fn too_few_outputs_fail() {
        let topics = TopicRegistry::new();
        let err = Wiring::resolve(&topics, &info(), &names(&["A", "B"]), &[]).unwrap_err();
        assert!(err.to_string().contains("at least 1 output,"));
    }

    #[test]
    fn empty_topic_name_is_unresolved() {
        let topics = TopicRegistry::new();
        let err =
            Wiring::resolve(&topics, &info(), &names(&["A", ""]), &names(&["C"])).unwrap_err();
        assert!(err.to_string().contains("unresolved input topic #2"));
    }

    #[test]
    fn extra_names_are_ignored() {
        let topics = TopicRegistry::new();
        let wiring =
            Wiring::resolve(&topics, &info(), &names(&["A", "B", "Z"]), &names(&["C", "D"]))
                .unwrap();

        assert_eq!(wiring.input_names(), vec!["A", "B"]);
        assert_eq!(wiring.output_names(), vec!["C"]);
        assert!(!topics.contains("Z"));
    }

    #[test]
    fn attach_and_detach() {
        let topics = TopicRegistry::new();
        let wiring =
            Wiring::resolve(&topics, &info(), &names(&["A", "B"]), &names(&["C"])).unwrap();
        let agent = RecordingAgent::new("rec");
        wiring.attach(agent.clone());

        let a = topics.lookup("A").unwrap();
        let c = topics.lookup("C").unwrap();
        assert!(a.is_subscribed(agent.id()));
        assert!(c.is_publisher(agent.id()));

        wiring.detach(agent.id(), "rec").unwrap();
        assert!(!a.is_subscribed(agent.id()));
        assert!(!c.is_publisher(agent.id()));
        assert!(wiring.is_closed());

        // Second detach is a no-op.
        wiring.detach(agent.id(), "rec").unwrap();
    }

    #[test]
    fn detach_reports_vanished_topics() {
        let topics = TopicRegistry::new();
        let wiring =
            Wiring::resolve(&topics, &info(), &names(&["A", "B"]), &names(&["C"])).unwrap();
        let agent = RecordingAgent::new("rec");
        wiring.attach(agent.clone());

        topics.clear();

        let err = wiring.detach(agent.id(), "rec").unwrap_err();
        assert_eq!(
            err,
            RivuletError::CleanupFailed {
                agent: "rec".to_string(),
                topics: names(&["A", "B", "C"]),
            }
        );
    }

    #[test]
    fn input_index_finds_first_match() {
        let topics = TopicRegistry::new();
        let wiring =
            Wiring::resolve(&topics, &info(), &names(&["A", "A"]), &names(&["C"])).unwrap();
        assert_eq!(wiring.input_index("A"), Some(0));
        assert_eq!(wiring.input_index("C"), None);
    }

    #[test]
    fn publish_to_output() {
        let topics = TopicRegistry::new();
        let wiring =
            Wiring::resolve(&topics, &info(), &names(&["A", "B"]), &names(&["C"])).unwrap();

        assert!(wiring.publish(0, Message::from_number(1.0)));
        assert_eq!(topics.lookup("C").unwrap().last_number(), Some(1.0));
        assert!(!wiring.publish(5, Message::from_number(1.0)));
    }
}
