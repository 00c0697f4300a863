//! Strongly-typed identifiers for Rivulet entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_AGENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a single agent instance.
///
/// Topics use it for subscriber and publisher set membership, so two agents
/// that happen to share a display name are still distinct subscribers.
/// Identifiers are allocated from a process-wide counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u64);

impl AgentId {
    /// Allocate the next unused agent ID.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_AGENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Create an agent ID from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent_{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocated_ids_are_unique() {
        let a = AgentId::next();
        let b = AgentId::next();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn agent_id_display() {
        assert_eq!(AgentId::new(7).to_string(), "agent_7");
    }
}
