//! Test doubles for code that wires agents into topics.
//!
//! [`RecordingAgent`] implements [`Agent`] and remembers every callback it
//! receives, which makes ordering and delivery assertions straightforward in
//! this crate and in the crates built on top of it.

use crate::error::Result;
use crate::message::Message;
use crate::traits::Agent;
use crate::types::AgentId;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Shared log of `(agent, topic, text)` callbacks across several agents.
pub type CallbackLog = Arc<Mutex<Vec<(String, String, String)>>>;

type ReceiveHook = Box<dyn Fn(&str, &Message) + Send + Sync>;

/// An agent that records what it receives.
pub struct RecordingAgent {
    id: AgentId,
    name: String,
    received: Mutex<Vec<(String, String)>>,
    log: Option<CallbackLog>,
    hook: Option<ReceiveHook>,
    resets: AtomicUsize,
    closed: AtomicBool,
}

impl RecordingAgent {
    fn build(name: &str, log: Option<CallbackLog>, hook: Option<ReceiveHook>) -> Arc<Self> {
        Arc::new(Self {
            id: AgentId::next(),
            name: name.to_string(),
            received: Mutex::new(Vec::new()),
            log,
            hook,
            resets: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        })
    }

    /// Create a recording agent.
    pub fn new(name: &str) -> Arc<Self> {
        Self::build(name, None, None)
    }

    /// Create a recording agent that also appends to a shared log.
    pub fn with_log(name: &str, log: CallbackLog) -> Arc<Self> {
        Self::build(name, Some(log), None)
    }

    /// Create a recording agent that runs `hook` after recording each callback.
    pub fn hooked(name: &str, hook: impl Fn(&str, &Message) + Send + Sync + 'static) -> Arc<Self> {
        Self::build(name, None, Some(Box::new(hook)))
    }

    /// Every `(topic, text)` pair received so far.
    pub fn received(&self) -> Vec<(String, String)> {
        self.received.lock().clone()
    }

    /// Numeric views of every message received so far.
    pub fn numbers(&self) -> Vec<f64> {
        self.received
            .lock()
            .iter()
            .map(|(_, text)| Message::from_text(text.as_str()).as_number())
            .collect()
    }

    /// How many times `reset` was called.
    pub fn reset_count(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    /// Whether `close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Agent for RecordingAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn receive(&self, topic: &str, message: &Message) {
        self.received
            .lock()
            .push((topic.to_string(), message.as_text().to_string()));
        if let Some(log) = &self.log {
            log.lock().push((
                self.name.clone(),
                topic.to_string(),
                message.as_text().to_string(),
            ));
        }
        if let Some(hook) = &self.hook {
            hook(topic, message);
        }
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
