//! Plus agent (`std::plus`).

use super::instance_name;
use parking_lot::Mutex;
use rivulet_core::error::Result;
use rivulet_core::message::Message;
use rivulet_core::registry::TopicRegistry;
use rivulet_core::traits::{Agent, AgentInfo};
use rivulet_core::types::AgentId;
use rivulet_core::wiring::Wiring;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
struct Operands {
    x: f64,
    y: f64,
}

/// Sums the latest values seen on two input topics.
///
/// Unlike [`BinaryOpAgent`](super::BinaryOpAgent), the operands are kept
/// locally: each input updates its own field, both start at `0.0`, and the
/// sum is published only while neither field is NaN.
///
/// # Topics
/// - Input: "x" - First operand
/// - Input: "y" - Second operand
/// - Output: "sum" - `x + y`
#[derive(Debug)]
pub struct PlusAgent {
    id: AgentId,
    name: String,
    wiring: Wiring,
    operands: Mutex<Operands>,
}

impl PlusAgent {
    /// Metadata of this agent type.
    pub fn info() -> AgentInfo {
        AgentInfo::new("std", "plus")
            .with_description("Publishes the sum of the last values seen on two inputs")
            .with_inputs(&["x", "y"])
            .with_outputs(&["sum"])
    }

    /// Create a plus agent and wire it into `topics`.
    ///
    /// # Errors
    /// Fails with a configuration error when fewer than two inputs or one
    /// output are given.
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
            operands: Mutex::new(Operands::default()),
        });
        agent.wiring.attach(agent.clone());
        Ok(agent)
    }

    /// Current `(x, y)` operands.
    pub fn operands(&self) -> (f64, f64) {
        let operands = *self.operands.lock();
        (operands.x, operands.y)
    }
}

impl Agent for PlusAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&self) {
        *self.operands.lock() = Operands::default();
    }

    fn receive(&self, topic: &str, message: &Message) {
        if self.wiring.is_closed() {
            return;
        }

        let sum = {
            let mut operands = self.operands.lock();
            match self.wiring.input_index(topic) {
                Some(0) => operands.x = message.as_number(),
                Some(1) => operands.y = message.as_number(),
                _ => return,
            }
            if operands.x.is_nan() || operands.y.is_nan() {
                tracing::trace!(agent = %self.name, "Operand is NaN; not publishing");
                return;
            }
            operands.x + operands.y
        };

        self.wiring.publish(0, Message::from_number(sum));
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

    fn setup() -> (TopicRegistry, Arc<PlusAgent>, Arc<RecordingAgent>) {
        let topics = TopicRegistry::new();
        let agent = PlusAgent::new(&topics, None, &names(&["A", "B"]), &names(&["C"])).unwrap();
        let sink = RecordingAgent::new("sink");
        topics.get("C").unwrap().subscribe(sink.clone());
        (topics, agent, sink)
    }

    #[test]
    fn sums_both_inputs() {
        let (topics, _agent, sink) = setup();
        topics.get("A").unwrap().publish(Message::from_number(2.0));
        topics.get("B").unwrap().publish(Message::from_number(3.0));

        assert_eq!(sink.numbers(), vec![2.0, 5.0]);
    }

    #[test]
    fn missing_operand_defaults_to_zero() {
        let (topics, _agent, sink) = setup();
        topics.get("B").unwrap().publish(Message::from_number(7.0));

        assert_eq!(sink.numbers(), vec![7.0]);
    }

    #[test]
    fn nan_operand_suppresses_publish() {
        let (topics, agent, sink) = setup();
        topics.get("A").unwrap().publish(Message::from_text("oops"));
        assert!(sink.received().is_empty());

        topics.get("B").unwrap().publish(Message::from_number(1.0));
        assert!(sink.received().is_empty());

        topics.get("A").unwrap().publish(Message::from_number(1.0));
        assert_eq!(sink.numbers(), vec![2.0]);
        assert_eq!(agent.operands(), (1.0, 1.0));
    }

    #[test]
    fn reset_clears_locally_without_publishing() {
        let (topics, agent, sink) = setup();
        topics.get("A").unwrap().publish(Message::from_number(4.0));

        agent.reset();

        assert_eq!(agent.operands(), (0.0, 0.0));
        assert_eq!(sink.received().len(), 1);
        assert_eq!(topics.get("A").unwrap().last_number(), Some(4.0));
    }

    #[test]
    fn requires_two_inputs() {
        let topics = TopicRegistry::new();
        let err = PlusAgent::new(&topics, None, &names(&["A"]), &names(&["C"])).unwrap_err();
        assert!(err.to_string().contains("std::plus"));
    }

    #[test]
    fn close_detaches_from_all_topics() {
        let (topics, agent, sink) = setup();
        agent.close().unwrap();

        topics.get("A").unwrap().publish(Message::from_number(1.0));
        topics.get("B").unwrap().publish(Message::from_number(1.0));

        assert!(sink.received().is_empty());
        assert!(!topics.get("C").unwrap().is_publisher(agent.id()));
    }
}
