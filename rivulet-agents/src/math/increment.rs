//! Increment agent (`std::inc`).

use super::instance_name;
use rivulet_core::error::Result;
use rivulet_core::message::Message;
use rivulet_core::registry::TopicRegistry;
use rivulet_core::traits::{Agent, AgentInfo};
use rivulet_core::types::AgentId;
use rivulet_core::wiring::Wiring;
use std::sync::Arc;

/// Publishes `input + 1` for every message on its input topic.
///
/// # Topics
/// - Input: "in" - Any message; its numeric view is used
/// - Output: "out" - The incremented number
///
/// # Example Configuration
/// ```text
/// std::inc
/// counter
/// counter_next
/// ```
#[derive(Debug)]
pub struct IncrementAgent {
    id: AgentId,
    name: String,
    wiring: Wiring,
}

impl IncrementAgent {
    /// Metadata of this agent type.
    pub fn info() -> AgentInfo {
        AgentInfo::new("std", "inc")
            .with_description("Publishes its input plus one")
            .with_inputs(&["in"])
            .with_outputs(&["out"])
    }

    /// Create an increment agent and wire it into `topics`.
    ///
    /// When `name` is `None` a unique name such as `inc#3` is generated.
    ///
    /// # Errors
    /// Fails with a configuration error when fewer than one input or output
    /// topic is given, before anything is wired.
    pub fn new(
        topics: &TopicRegistry,
        name: Option<&str>,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Arc<Self>> {
        let info = Self::info();
        let wiring = Wiring::resolve(topics, &info, inputs, outputs)?;
        let id = AgentId::next();
        let agent = Arc::new(Self {
            id,
            name: name.map_or_else(|| instance_name(&info, id), str::to_string),
            wiring,
        });
        agent.wiring.attach(agent.clone());
        Ok(agent)
    }
}

impl Agent for IncrementAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&self) {}

    fn receive(&self, topic: &str, message: &Message) {
        if self.wiring.is_closed() || self.wiring.input_index(topic) != Some(0) {
            return;
        }
        let value = message.as_number() + 1.0;
        tracing::trace!(agent = %self.name, input = %message, value, "Incrementing");
        self.wiring.publish(0, Message::from_number(value));
    }

    fn close(&self) -> Result<()> {
        self.wiring.detach(self.id, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivulet_core::testing::RecordingAgent;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn setup() -> (TopicRegistry, Arc<IncrementAgent>, Arc<RecordingAgent>) {
        let topics = TopicRegistry::new();
        let agent = IncrementAgent::new(&topics, None, &names(&["A"]), &names(&["B"])).unwrap();
        let sink = RecordingAgent::new("sink");
        topics.get("B").unwrap().subscribe(sink.clone());
        (topics, agent, sink)
    }

    #[test]
    fn increments_numeric_input() {
        let (topics, _agent, sink) = setup();
        let a = topics.get("A").unwrap();

        for value in [0.0, -5.0, 3.2] {
            a.publish(Message::from_number(value));
        }

        assert_eq!(sink.numbers(), vec![1.0, -4.0, 4.2]);
    }

    #[test]
    fn one_publish_per_input() {
        let (topics, _agent, sink) = setup();
        topics.get("A").unwrap().publish(Message::from_text("41"));

        assert_eq!(sink.received(), vec![("B".to_string(), "42.0".to_string())]);
    }

    #[test]
    fn non_numeric_input_yields_nan() {
        let (topics, _agent, sink) = setup();
        topics.get("A").unwrap().publish(Message::from_text("abc"));

        let numbers = sink.numbers();
        assert_eq!(numbers.len(), 1);
        assert!(numbers[0].is_nan());
    }

    #[test]
    fn generated_and_explicit_names() {
        let topics = TopicRegistry::new();
        let generated = IncrementAgent::new(&topics, None, &names(&["A"]), &names(&["B"])).unwrap();
        let named =
            IncrementAgent::new(&topics, Some("counter"), &names(&["A"]), &names(&["B"])).unwrap();

        assert_eq!(generated.name(), format!("inc#{}", generated.id().as_u64()));
        assert_eq!(named.name(), "counter");
    }

    #[test]
    fn wires_itself_on_construction() {
        let (topics, agent, _sink) = setup();
        assert!(topics.get("A").unwrap().is_subscribed(agent.id()));
        assert!(topics.get("B").unwrap().is_publisher(agent.id()));
    }

    #[test]
    fn missing_output_fails_without_wiring() {
        let topics = TopicRegistry::new();
        let err = IncrementAgent::new(&topics, None, &names(&["A"]), &[]).unwrap_err();

        assert_eq!(err.code(), "E101");
        assert!(topics.is_empty());
    }

    #[test]
    fn closed_agent_no_longer_receives() {
        let (topics, agent, sink) = setup();
        agent.close().unwrap();
        agent.close().unwrap();

        topics.get("A").unwrap().publish(Message::from_number(1.0));

        assert!(sink.received().is_empty());
        assert_eq!(topics.get("A").unwrap().subscriber_count(), 0);
        assert_eq!(topics.get("B").unwrap().publisher_count(), 0);
    }
}
