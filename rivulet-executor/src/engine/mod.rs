//! The engine: the composition root that owns the topic registry, the agent
//! factories and the active configuration.
//!
//! Everything that drives a running dataflow (the HTTP API, the CLI, tests)
//! goes through an [`Engine`]. It can be used directly or through the
//! message-style [`Engine::handle`] entry point.

#[allow(clippy::module_inception)]
mod engine;
mod request;

pub use engine::{Engine, FailureView, LoadReport, TopicView};
pub use request::{EngineRequest, EngineResponse, Operation, ResponseStatus};
