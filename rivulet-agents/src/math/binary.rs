//! Generic binary numeric agent.
//!
//! A [`BinaryOpAgent`] combines the values of two input topics with a
//! function `f(x, y)`. It keeps no operand state of its own: when one input
//! changes, the other operand is read from that topic's last message
//! (`0.0` if nothing was published yet).

use super::instance_name;
use rivulet_core::error::Result;
use rivulet_core::message::Message;
use rivulet_core::registry::TopicRegistry;
use rivulet_core::traits::{Agent, AgentInfo};
use rivulet_core::types::AgentId;
use rivulet_core::wiring::Wiring;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A shareable binary function on numbers.
pub type BinaryFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Built-in binary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOperation {
    /// `x + y`
    Add,
    /// `x - y`
    Sub,
    /// `x * y`
    Mul,
    /// `x / y` (IEEE semantics, so division by zero yields an infinity or NaN)
    Div,
    /// The smaller operand; a NaN operand is ignored.
    Min,
    /// The larger operand; a NaN operand is ignored.
    Max,
    /// `x` raised to the power `y`
    Pow,
}

impl BinaryOperation {
    /// Every built-in operation.
    pub const ALL: [Self; 7] = [
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
        Self::Min,
        Self::Max,
        Self::Pow,
    ];

    /// Apply the operation.
    pub fn apply(&self, x: f64, y: f64) -> f64 {
        match self {
            Self::Add => x + y,
            Self::Sub => x - y,
            Self::Mul => x * y,
            Self::Div => x / y,
            Self::Min => x.min(y),
            Self::Max => x.max(y),
            Self::Pow => x.powf(y),
        }
    }

    /// Short name, also the type identifier suffix (`std::<name>`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::Div => "div",
            Self::Min => "min",
            Self::Max => "max",
            Self::Pow => "pow",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::Add => "Publishes x + y",
            Self::Sub => "Publishes x - y",
            Self::Mul => "Publishes x * y",
            Self::Div => "Publishes x / y",
            Self::Min => "Publishes the smaller of x and y",
            Self::Max => "Publishes the larger of x and y",
            Self::Pow => "Publishes x raised to the power y",
        }
    }

    /// Wrap the operation as a [`BinaryFn`].
    pub fn function(self) -> BinaryFn {
        Arc::new(move |x, y| self.apply(x, y))
    }
}

impl fmt::Display for BinaryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BinaryOperation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| format!("unknown binary operation '{}'", s))
    }
}

/// Applies `f(x, y)` whenever either input topic receives a message.
///
/// # Topics
/// - Input: "x" - First operand
/// - Input: "y" - Second operand
/// - Output: "out" - `f(x, y)`
///
/// # Reset
///
/// Resetting publishes `0.0` on both input topics. Every other subscriber
/// of those topics, this agent included, observes the two messages.
pub struct BinaryOpAgent {
    id: AgentId,
    name: String,
    wiring: Wiring,
    operation: Option<BinaryOperation>,
    function: BinaryFn,
}

impl BinaryOpAgent {
    /// Metadata for the built-in `operation`.
    pub fn info(operation: BinaryOperation) -> AgentInfo {
        Self::info_for("std", operation.name()).with_description(operation.description())
    }

    fn info_for(namespace: &str, name: &str) -> AgentInfo {
        AgentInfo::new(namespace, name)
            .with_inputs(&["x", "y"])
            .with_outputs(&["out"])
    }

    /// Create an agent applying an arbitrary function.
    ///
    /// # Errors
    /// Fails with a configuration error when fewer than two inputs or one
    /// output are given.
    pub fn new(
        topics: &TopicRegistry,
        name: &str,
        inputs: &[String],
        outputs: &[String],
        function: impl Fn(f64, f64) -> f64 + Send + Sync + 'static,
    ) -> Result<Arc<Self>> {
        let info = Self::info_for("custom", "binop");
        Self::build(topics, &info, Some(name), None, Arc::new(function), inputs, outputs)
    }

    /// Create an agent applying a built-in operation.
    ///
    /// When `name` is `None` a unique name such as `mul#7` is generated.
    ///
    /// # Errors
    /// Fails with a configuration error when fewer than two inputs or one
    /// output are given.
    pub fn with_operation(
        topics: &TopicRegistry,
        name: Option<&str>,
        operation: BinaryOperation,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Arc<Self>> {
        let info = Self::info(operation);
        Self::build(
            topics,
            &info,
            name,
            Some(operation),
            operation.function(),
            inputs,
            outputs,
        )
    }

    fn build(
        topics: &TopicRegistry,
        info: &AgentInfo,
        name: Option<&str>,
        operation: Option<BinaryOperation>,
        function: BinaryFn,
        inputs: &[String],
        outputs: &[String],
    ) -> Result<Arc<Self>> {
        let wiring = Wiring::resolve(topics, info, inputs, outputs)?;
        let id = AgentId::next();
        let agent = Arc::new(Self {
            id,
            name: name.map_or_else(|| instance_name(info, id), str::to_string),
            wiring,
            operation,
            function,
        });
        agent.wiring.attach(agent.clone());
        Ok(agent)
    }

    /// The built-in operation, or `None` for a custom function.
    pub fn operation(&self) -> Option<BinaryOperation> {
        self.operation
    }

    fn last_value(&self, input: usize) -> f64 {
        self.wiring
            .input(input)
            .and_then(|topic| topic.last_number())
            .unwrap_or(0.0)
    }
}

impl fmt::Debug for BinaryOpAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryOpAgent")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("operation", &self.operation)
            .field("wiring", &self.wiring)
            .finish_non_exhaustive()
    }
}

impl Agent for BinaryOpAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&self) {
        if self.wiring.is_closed() {
            return;
        }
        tracing::debug!(agent = %self.name, "Resetting input topics");
        for input in 0..2 {
            if let Some(topic) = self.wiring.input(input) {
                topic.publish(Message::from_number(0.0));
            }
        }
    }

    fn receive(&self, topic: &str, message: &Message) {
        if self.wiring.is_closed() {
            return;
        }
        let (x, y) = match self.wiring.input_index(topic) {
            Some(0) => (message.as_number(), self.last_value(1)),
            Some(1) => (self.last_value(0), message.as_number()),
            _ => return,
        };
        let result = (self.function)(x, y);
        tracing::trace!(agent = %self.name, x, y, result, "Applying binary operation");
        self.wiring.publish(0, Message::from_number(result));
    }

    fn close(&self) -> Result<()> {
        self.wiring.detach(self.id, &self.name)
    }
}
