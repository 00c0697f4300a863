//! Request routing for the API.
//!
//! Routes requests to appropriate handlers based on method and path.

use super::handlers;
use super::response;
use super::state::AppState;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Route prefix for all API endpoints.
pub const API_PREFIX: &str = "/api/v1";

/// Route an incoming request to the appropriate handler.
pub async fn route<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    tracing::debug!(method = %method, path = %path, "Routing request");

    let Some(path) = path.strip_prefix(API_PREFIX) else {
        return Ok(response::not_found());
    };

    let response = match (method, path) {
        (Method::GET, "/health") => handlers::health::get_health(state).await,
        (Method::GET, "/status") => handlers::health::get_status(state).await,

        (Method::POST, "/config") => handlers::config::load(req, state).await,
        (Method::GET, "/config") => handlers::config::get(state).await,
        (_, "/config") => response::method_not_allowed(&["GET", "POST"]),

        (Method::POST, "/reset") => handlers::config::reset(state).await,
        (_, "/reset") => response::method_not_allowed(&["POST"]),

        (Method::GET, "/topics") => handlers::topics::list(state).await,
        (_, "/topics") => response::method_not_allowed(&["GET"]),
        (method, p) if p.starts_with("/topics/") => {
            let topic = &p["/topics/".len()..];
            match method {
                _ if topic.is_empty() || topic.contains('/') => response::not_found(),
                Method::POST => handlers::topics::publish_body(req, state, topic).await,
                _ => response::method_not_allowed(&["POST"]),
            }
        }

        (Method::GET, "/publish") => handlers::topics::publish_query(req, state).await,
        (_, "/publish") => response::method_not_allowed(&["GET"]),

        (Method::GET, "/graph") => handlers::graph::get(req, state).await,
        (Method::GET, "/graph/cycles") => handlers::graph::cycles(state).await,
        (_, "/graph" | "/graph/cycles") => response::method_not_allowed(&["GET"]),

        _ => response::not_found(),
    };

    Ok(response)
}
