//! Configuration and lifecycle handlers.

use crate::api::error::ApiError;
use crate::api::request;
use crate::api::response;
use crate::api::state::AppState;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::{Request, Response};
use std::sync::Arc;

/// POST /api/v1/config
///
/// Replace the running configuration with the text in the body.
pub async fn load<B>(req: Request<B>, state: Arc<AppState>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let text = match request::read_body_string(req).await {
        Ok(t) => t,
        Err(e) => return e.into_response(),
    };

    match state.run_engine(move |engine| engine.load_config(&text)).await {
        Ok(Ok(report)) => {
            state.record_load();
            response::ok(&report)
        }
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Configuration load failed");
            ApiError::from(e).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// GET /api/v1/config
///
/// The running configuration, as parsed records and as text.
pub async fn get(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let definition = state.engine.definition();
    let body = serde_json::json!({
        "agents": definition.agents,
        "text": definition.to_text(),
    });
    response::ok(&body)
}

/// POST /api/v1/reset
///
/// Reset every agent.
pub async fn reset(state: Arc<AppState>) -> Response<Full<Bytes>> {
    match state.run_engine(|engine| engine.reset_all()).await {
        Ok(Ok(count)) => response::ok(&serde_json::json!({ "reset": count })),
        Ok(Err(e)) => ApiError::from(e).into_response(),
        Err(e) => e.into_response(),
    }
}
