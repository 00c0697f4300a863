//! Message-style access to an [`Engine`].

use super::engine::{Engine, LoadReport};
use crate::topology::GraphSnapshot;
use rivulet_core::error::{Result, RivuletError};
use serde::{Deserialize, Serialize};

/// What an [`EngineRequest`] asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Load the configuration text carried in `value`.
    Load,
    /// Publish `value` on `topic`.
    Publish,
    /// Return a graph snapshot.
    Snapshot,
    /// Report whether the topology is acyclic.
    CheckCycles,
    /// Reset every agent.
    Reset,
}

/// A request to an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRequest {
    /// The operation.
    pub operation: Operation,
    /// Target topic for [`Operation::Publish`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Payload: message text or configuration text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl EngineRequest {
    /// Request a configuration load.
    pub fn load(text: impl Into<String>) -> Self {
        Self {
            operation: Operation::Load,
            topic: None,
            value: Some(text.into()),
        }
    }

    /// Request a publish.
    pub fn publish(topic: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            operation: Operation::Publish,
            topic: Some(topic.into()),
            value: Some(value.into()),
        }
    }

    /// Request with no arguments.
    pub fn op(operation: Operation) -> Self {
        Self {
            operation,
            topic: None,
            value: None,
        }
    }
}

/// Outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The request succeeded.
    Ok,
    /// The request failed; see [`EngineResponse::error`].
    Error,
}

/// The reply to an [`EngineRequest`].
#[derive(Debug, Clone, Serialize)]
pub struct EngineResponse {
    /// Outcome.
    pub status: ResponseStatus,
    /// Graph snapshot, returned by every successful request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphSnapshot>,
    /// Load summary for [`Operation::Load`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadReport>,
    /// Error code, when failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Error message, when failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EngineResponse {
    fn ok(graph: GraphSnapshot, load: Option<LoadReport>) -> Self {
        Self {
            status: ResponseStatus::Ok,
            graph: Some(graph),
            load,
            code: None,
            error: None,
        }
    }

    fn failed(error: &RivuletError) -> Self {
        Self {
            status: ResponseStatus::Error,
            graph: None,
            load: None,
            code: Some(error.code()),
            error: Some(error.to_string()),
        }
    }

    /// Whether the request succeeded.
    pub fn is_ok(&self) -> bool {
        self.status == ResponseStatus::Ok
    }
}

impl Engine {
    /// Serve one request.
    ///
    /// Successful requests return the graph snapshot taken after the
    /// operation, so a caller always sees the effect of what it asked for.
    pub fn handle(&self, request: EngineRequest) -> EngineResponse {
        tracing::debug!(operation = ?request.operation, "Handling engine request");
        match self.dispatch(request) {
            Ok(load) => EngineResponse::ok(self.snapshot(), load),
            Err(e) => {
                tracing::debug!(error = %e, "Engine request failed");
                EngineResponse::failed(&e)
            }
        }
    }

    fn dispatch(&self, request: EngineRequest) -> Result<Option<LoadReport>> {
        match request.operation {
            Operation::Load => {
                let text = required(request.value, "load requires a configuration value")?;
                self.load_config(&text).map(Some)
            }
            Operation::Publish => {
                let topic = required(request.topic, "publish requires a topic")?;
                let value = required(request.value, "publish requires a value")?;
                self.publish(&topic, &value)?;
                Ok(None)
            }
            Operation::Reset => {
                self.reset_all()?;
                Ok(None)
            }
            Operation::Snapshot | Operation::CheckCycles => Ok(None),
        }
    }
}

fn required(value: Option<String>, cause: &str) -> Result<String> {
    value.ok_or_else(|| RivuletError::invalid_argument(cause))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_then_publish() {
        let engine = Engine::new();

        let response = engine.handle(EngineRequest::load("std::inc\nA\nB\n"));
        assert!(response.is_ok());
        assert_eq!(response.load.as_ref().unwrap().agents.len(), 1);

        let response = engine.handle(EngineRequest::publish("A", "1"));
        let graph = response.graph.unwrap();
        let b = graph.nodes.iter().find(|n| n.id == "TB").unwrap();
        assert_eq!(b.value.as_deref(), Some("2.0"));
        assert!(graph.acyclic);
    }

    #[test]
    fn missing_arguments_fail() {
        let engine = Engine::new();
        let response = engine.handle(EngineRequest::op(Operation::Publish));

        assert_eq!(response.status, ResponseStatus::Error);
        assert_eq!(response.code, Some("E001"));
        assert!(response.graph.is_none());
    }

    #[test]
    fn cyclic_load_reports_error() {
        let engine = Engine::new();
        let response = engine.handle(EngineRequest::load("std::plus\nA,B\nB\n"));
        assert_eq!(response.code, Some("E201"));
    }

    #[test]
    fn request_deserializes_from_json() {
        let request: EngineRequest =
            serde_json::from_str(r#"{"operation":"check_cycles"}"#).unwrap();
        assert_eq!(request, EngineRequest::op(Operation::CheckCycles));

        let json = serde_json::to_value(EngineResponse::failed(
            &RivuletError::invalid_argument("x"),
        ))
        .unwrap();
        assert_eq!(json["status"], "error");
        assert!(json.get("graph").is_none());
    }
}
