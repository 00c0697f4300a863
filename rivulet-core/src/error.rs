//! Error types for Rivulet.
//!
//! Every variant carries a stable code (e.g. `E101`) so callers in other
//! layers (the HTTP API, the CLI) can report failures without matching on
//! message text.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Rivulet operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RivuletError {
    // =========================================================================
    // Argument Errors (E001-E099)
    // =========================================================================
    /// A value passed to a constructor was absent or malformed.
    #[error("E001: Invalid argument: {cause}")]
    InvalidArgument {
        /// What was wrong with the argument.
        cause: String,
    },

    // =========================================================================
    // Configuration Errors (E100-E199)
    // =========================================================================
    /// An agent could not be constructed from its declaration.
    #[error("E101: Failed to configure agent '{agent_type}': {cause}")]
    Configuration {
        /// Type identifier of the agent being constructed.
        agent_type: String,
        /// Reason for the failure.
        cause: String,
    },

    /// No factory is registered for the requested agent type.
    #[error("E102: Unknown agent type '{agent_type}'")]
    UnknownAgentType {
        /// The type identifier that was looked up.
        agent_type: String,
    },

    /// The configuration text could not be parsed.
    #[error("E103: Configuration parse error at line {line}: {cause}")]
    ConfigParse {
        /// 1-based line number of the offending record.
        line: usize,
        /// Description of the syntax problem.
        cause: String,
    },

    // =========================================================================
    // Topology Errors (E200-E299)
    // =========================================================================
    /// A wiring was rejected for activation because it contains a cycle.
    #[error("E201: Refusing to activate cyclic topology ({agents} agents, {topics} topics)")]
    CyclicTopology {
        /// Number of agents in the rejected wiring.
        agents: usize,
        /// Number of topics in the rejected wiring.
        topics: usize,
    },

    // =========================================================================
    // Lifecycle Errors (E300-E399)
    // =========================================================================
    /// An agent could not detach from some of its topics while closing.
    #[error("E301: Agent '{agent}' failed to detach from topics [{}]", .topics.join(", "))]
    CleanupFailed {
        /// Name of the agent being closed.
        agent: String,
        /// Topics that could no longer be reached.
        topics: Vec<String>,
    },

    // =========================================================================
    // I/O Errors (E900-E999)
    // =========================================================================
    /// File system operation failed.
    #[error("E901: I/O error at {path}: {cause}")]
    Io {
        /// The path involved in the failed operation.
        path: PathBuf,
        /// Reason for the failure.
        cause: String,
    },

    /// Network operation failed.
    #[error("E902: Network error: {cause}")]
    Network {
        /// Reason for the failure.
        cause: String,
    },
}

impl RivuletError {
    /// Shorthand for a [`RivuletError::Configuration`] error.
    pub fn configuration(agent_type: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::Configuration {
            agent_type: agent_type.into(),
            cause: cause.into(),
        }
    }

    /// Shorthand for a [`RivuletError::InvalidArgument`] error.
    pub fn invalid_argument(cause: impl Into<String>) -> Self {
        Self::InvalidArgument {
            cause: cause.into(),
        }
    }

    /// Get the error code (e.g., "E101").
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "E001",
            Self::Configuration { .. } => "E101",
            Self::UnknownAgentType { .. } => "E102",
            Self::ConfigParse { .. } => "E103",
            Self::CyclicTopology { .. } => "E201",
            Self::CleanupFailed { .. } => "E301",
            Self::Io { .. } => "E901",
            Self::Network { .. } => "E902",
        }
    }

    /// Check if this error is a configuration/validation error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. }
                | Self::UnknownAgentType { .. }
                | Self::ConfigParse { .. }
                | Self::CyclicTopology { .. }
        )
    }
}

/// Result type alias using RivuletError.
pub type Result<T> = std::result::Result<T, RivuletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_correct() {
        let err = RivuletError::invalid_argument("missing text");
        assert_eq!(err.code(), "E001");

        let err = RivuletError::configuration("std::inc", "requires 1 input");
        assert_eq!(err.code(), "E101");

        let err = RivuletError::CleanupFailed {
            agent: "inc#1".to_string(),
            topics: vec!["A".to_string()],
        };
        assert_eq!(err.code(), "E301");
    }

    #[test]
    fn error_display() {
        let err = RivuletError::CleanupFailed {
            agent: "plus#3".to_string(),
            topics: vec!["X".to_string(), "Y".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("E301"));
        assert!(msg.contains("plus#3"));
        assert!(msg.contains("X, Y"));
    }

    #[test]
    fn config_errors() {
        assert!(
            RivuletError::UnknownAgentType {
                agent_type: "std::nope".to_string()
            }
            .is_config_error()
        );

        assert!(
            !RivuletError::Network {
                cause: "reset".to_string()
            }
            .is_config_error()
        );
    }
}
