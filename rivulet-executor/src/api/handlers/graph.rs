//! Topology handlers.

use crate::api::request;
use crate::api::response;
use crate::api::state::AppState;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Request, Response};
use std::sync::Arc;

/// GET /api/v1/graph
///
/// JSON snapshot, or Graphviz DOT with `?format=dot`.
pub async fn get<B>(req: Request<B>, state: Arc<AppState>) -> Response<Full<Bytes>> {
    let snapshot = state.engine.snapshot();
    let format = request::query_params(&req).remove("format");

    match format.as_deref() {
        Some("dot") => response::ok_text("text/vnd.graphviz", snapshot.to_dot()),
        _ => response::ok(&snapshot),
    }
}

/// GET /api/v1/graph/cycles
pub async fn cycles(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let graph = state.engine.graph();
    let cycle = graph.find_cycle();
    let body = serde_json::json!({
        "acyclic": cycle.is_none(),
        "cycle": cycle,
    });
    response::ok(&body)
}
