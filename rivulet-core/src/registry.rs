//! Topic directory with get-or-create semantics.
//!
//! One [`TopicRegistry`] is built at the composition root and shared by
//! reference (usually behind an `Arc`) with every component that resolves
//! topic names. It is the only owner of [`Topic`] instances.

use crate::error::{Result, RivuletError};
use crate::topic::Topic;
use dashmap::DashMap;
use std::sync::Arc;

/// Maps topic names to topics, creating them on first lookup.
#[derive(Debug, Default)]
pub struct TopicRegistry {
    topics: DashMap<String, Arc<Topic>>,
}

impl TopicRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
        }
    }

    /// Get the topic called `name`, creating it if it does not exist.
    ///
    /// Concurrent calls for the same name always observe the same topic.
    ///
    /// # Errors
    /// Returns [`RivuletError::InvalidArgument`] if `name` is empty.
    pub fn get(&self, name: &str) -> Result<Arc<Topic>> {
        if name.is_empty() {
            return Err(RivuletError::invalid_argument(
                "topic name cannot be empty",
            ));
        }
        if let Some(topic) = self.topics.get(name) {
            return Ok(Arc::clone(topic.value()));
        }
        let topic = self
            .topics
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(topic = %name, "Creating topic");
                Arc::new(Topic::named(name.to_string()))
            })
            .value()
            .clone();
        Ok(topic)
    }

    /// Get an existing topic without creating it.
    pub fn lookup(&self, name: &str) -> Option<Arc<Topic>> {
        self.topics.get(name).map(|t| Arc::clone(t.value()))
    }

    /// Whether a topic with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.topics.contains_key(name)
    }

    /// Snapshot of all topics, sorted by name.
    pub fn topics(&self) -> Vec<Arc<Topic>> {
        let mut topics: Vec<_> = self
            .topics
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        topics.sort_by(|a, b| a.name().cmp(b.name()));
        topics
    }

    /// Sorted names of all topics.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.topics.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of topics.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether the registry holds no topics.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Remove every topic.
    ///
    /// Agents still wired to the removed topics are not closed by this call;
    /// they keep weak handles to topics that later lookups no longer return.
    /// Close agents first when rebuilding a configuration.
    pub fn clear(&self) {
        let count = self.topics.len();
        self.topics.clear();
        tracing::debug!(count, "Cleared topic registry");
    }
}
