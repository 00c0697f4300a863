//! Health and status endpoint handlers.

use crate::api::response;
use crate::api::state::AppState;
use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use std::sync::Arc;

/// GET /api/v1/health
///
/// Simple health check that returns 200 OK if the server is running.
pub async fn get_health(_state: Arc<AppState>) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "status": "healthy",
        "service": "rivulet"
    });

    response::ok(&body)
}

/// GET /api/v1/status
///
/// Returns uptime, topology size and request counters.
pub async fn get_status(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let engine = &state.engine;
    let graph = engine.graph();

    let body = serde_json::json!({
        "status": "running",
        "service": "rivulet",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.uptime_secs(),
        "topology": {
            "agents": engine.agent_names(),
            "topics": engine.topic_registry().len(),
            "edges": graph.edge_count(),
            "acyclic": !graph.has_cycles()
        },
        "requests": {
            "published": state.published(),
            "loads": state.loads()
        }
    });

    response::ok(&body)
}
