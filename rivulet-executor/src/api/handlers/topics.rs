//! Topic listing and publishing handlers.

use crate::api::error::ApiError;
use crate::api::request;
use crate::api::response;
use crate::api::state::AppState;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::{Request, Response};
use std::sync::Arc;

/// GET /api/v1/topics
pub async fn list(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let topics = state.engine.topics();
    let body = serde_json::json!({
        "topics": topics,
        "count": topics.len(),
    });
    response::ok(&body)
}

/// POST /api/v1/topics/{name}
///
/// Publish the `message` query parameter if present, otherwise the body.
pub async fn publish_body<B>(
    req: Request<B>,
    state: Arc<AppState>,
    topic: &str,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let topic = request::decode_path(topic);
    let from_query = request::query_params(&req).remove("message");

    let message = match from_query {
        Some(m) => m,
        None => match request::read_body_string(req).await {
            Ok(body) => body.trim().to_string(),
            Err(e) => return e.into_response(),
        },
    };

    publish(state, topic, message).await
}

/// GET /api/v1/publish?topic=&message=
pub async fn publish_query<B>(req: Request<B>, state: Arc<AppState>) -> Response<Full<Bytes>> {
    let mut params = request::query_params(&req);
    let Some(topic) = params.remove("topic") else {
        return ApiError::bad_request("E001", "Missing 'topic' query parameter").into_response();
    };
    let Some(message) = params.remove("message") else {
        return ApiError::bad_request("E001", "Missing 'message' query parameter")
            .into_response();
    };

    publish(state, topic, message).await
}

async fn publish(state: Arc<AppState>, topic: String, message: String) -> Response<Full<Bytes>> {
    let result = {
        let (topic, message) = (topic.clone(), message.clone());
        state
            .run_engine(move |engine| engine.publish(&topic, &message))
            .await
    };

    match result {
        Ok(Ok(subscribers)) => {
            state.record_publish();
            let snapshot = state.engine.snapshot();
            response::ok(&serde_json::json!({
                "topic": topic,
                "message": message,
                "subscribers": subscribers,
                "graph": snapshot,
            }))
        }
        Ok(Err(e)) => ApiError::from(e).into_response(),
        Err(e) => e.into_response(),
    }
}
