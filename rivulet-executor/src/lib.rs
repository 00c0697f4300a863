//! Rivulet Executor - drives a reactive topic/agent dataflow.
//!
//! This crate provides the infrastructure around the core dataflow types:
//! - Topology graph with cycle detection and topological ordering
//! - Configuration loader for the three-line agent record format
//! - The [`Engine`](engine::Engine) that owns a running configuration
//! - REST API for loading configurations and publishing messages
//! - Tracing subscriber setup

#![warn(missing_docs)]

pub mod api;
pub mod engine;
pub mod loader;
pub mod observability;
pub mod topology;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::{ApiError, ApiServer, AppState, ServerConfig, ShutdownHandle};
    pub use crate::engine::{
        Engine, EngineRequest, EngineResponse, LoadReport, Operation, ResponseStatus, TopicView,
    };
    pub use crate::loader::{
        CloseReport, ConfigBuilder, ConfigDefinition, ConfigLoader, LoadedConfig, LoaderConfig,
        LoaderError,
    };
    pub use crate::observability::{LogFormat, TracingConfig, init_tracing};
    pub use crate::topology::{GraphSnapshot, NodeKind, TopologyGraph};
}
