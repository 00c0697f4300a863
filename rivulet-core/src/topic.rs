//! Named broadcast channels.
//!
//! A [`Topic`] keeps two ordered agent sets (subscribers and publishers) and the
//! last message published on it. Publishing is synchronous: every subscriber's
//! [`Agent::receive`] runs on the caller's thread, in subscription order,
//! before [`Topic::publish`] returns.
//!
//! # Concurrency
//!
//! Both agent sets are copy-on-write. A publish clones the current subscriber
//! list (an `Arc` bump) and iterates that snapshot with no lock held, so
//! subscribers may subscribe, unsubscribe or publish again from inside their
//! callbacks. Agents added while a publish is in flight are not guaranteed to
//! see that publish.

use crate::error::{Result, RivuletError};
use crate::message::Message;
use crate::traits::Agent;
use crate::types::AgentId;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

type AgentList = Arc<Vec<Arc<dyn Agent>>>;

/// A named broadcast channel.
pub struct Topic {
    name: String,
    subscribers: RwLock<AgentList>,
    publishers: RwLock<AgentList>,
    last_message: RwLock<Option<Arc<Message>>>,
}

impl Topic {
    /// Create a topic.
    ///
    /// # Errors
    /// Returns [`RivuletError::InvalidArgument`] if `name` is empty.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(RivuletError::invalid_argument(
                "topic name cannot be empty",
            ));
        }
        Ok(Self::named(name))
    }

    pub(crate) fn named(name: String) -> Self {
        Self {
            name,
            subscribers: RwLock::new(Arc::new(Vec::new())),
            publishers: RwLock::new(Arc::new(Vec::new())),
            last_message: RwLock::new(None),
        }
    }

    /// The topic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subscribe an agent. Returns `false` if it was already subscribed.
    pub fn subscribe(&self, agent: Arc<dyn Agent>) -> bool {
        let added = insert(&self.subscribers, agent);
        if added {
            tracing::debug!(topic = %self.name, "Agent subscribed");
        }
        added
    }

    /// Unsubscribe an agent. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, agent: AgentId) -> bool {
        let removed = remove(&self.subscribers, agent);
        if removed {
            tracing::debug!(topic = %self.name, agent_id = %agent, "Agent unsubscribed");
        }
        removed
    }

    /// Record an agent as a publisher. Returns `false` if it already was one.
    ///
    /// Publisher bookkeeping is informational; it is used to draw the
    /// topology and is not checked against actual [`Topic::publish`] calls.
    pub fn add_publisher(&self, agent: Arc<dyn Agent>) -> bool {
        insert(&self.publishers, agent)
    }

    /// Remove an agent from the publisher set.
    pub fn remove_publisher(&self, agent: AgentId) -> bool {
        remove(&self.publishers, agent)
    }

    /// Publish a message to every current subscriber.
    ///
    /// Returns the number of subscribers that were invoked.
    pub fn publish(&self, message: Message) -> usize {
        let message = Arc::new(message);
        *self.last_message.write() = Some(Arc::clone(&message));

        let subscribers = Arc::clone(&self.subscribers.read());
        tracing::trace!(
            topic = %self.name,
            value = %message,
            subscribers = subscribers.len(),
            "Publishing message"
        );

        for agent in subscribers.iter() {
            agent.receive(&self.name, &message);
        }
        subscribers.len()
    }

    /// The last message published on this topic, if any.
    pub fn last_message(&self) -> Option<Arc<Message>> {
        self.last_message.read().clone()
    }

    /// Numeric view of the last message, if any.
    pub fn last_number(&self) -> Option<f64> {
        self.last_message.read().as_ref().map(|m| m.as_number())
    }

    /// Snapshot of the subscriber list in subscription order.
    pub fn subscribers(&self) -> Vec<Arc<dyn Agent>> {
        self.subscribers.read().as_ref().clone()
    }

    /// Snapshot of the publisher list in registration order.
    pub fn publishers(&self) -> Vec<Arc<dyn Agent>> {
        self.publishers.read().as_ref().clone()
    }

    /// Number of current subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Number of current publishers.
    pub fn publisher_count(&self) -> usize {
        self.publishers.read().len()
    }

    /// Whether the given agent is subscribed.
    pub fn is_subscribed(&self, agent: AgentId) -> bool {
        self.subscribers.read().iter().any(|a| a.id() == agent)
    }

    /// Whether the given agent is registered as a publisher.
    pub fn is_publisher(&self, agent: AgentId) -> bool {
        self.publishers.read().iter().any(|a| a.id() == agent)
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Topic")
            .field("name", &self.name)
            .field("subscribers", &self.subscriber_count())
            .field("publishers", &self.publisher_count())
            .field("last_message", &self.last_message.read().as_deref())
            .finish()
    }
}

fn insert(list: &RwLock<AgentList>, agent: Arc<dyn Agent>) -> bool {
    let mut guard = list.write();
    let id = agent.id();
    if guard.iter().any(|a| a.id() == id) {
        return false;
    }
    let mut next = guard.as_ref().clone();
    next.push(agent);
    *guard = Arc::new(next);
    true
}

fn remove(list: &RwLock<AgentList>, agent: AgentId) -> bool {
    let mut guard = list.write();
    if !guard.iter().any(|a| a.id() == agent) {
        return false;
    }
    let next: Vec<_> = guard.iter().filter(|a| a.id() != agent).cloned().collect();
    *guard = Arc::new(next);
    true
}
