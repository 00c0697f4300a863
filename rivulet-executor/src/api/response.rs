//! Response builders for the API.

use bytes::Bytes;
use http_body_util::Full;
use hyper::http::header::{self, HeaderValue};
use hyper::{Response, StatusCode};
use serde::Serialize;

const CSP_HEADER: &str = "default-src 'none'; frame-ancestors 'none';";

fn build(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}

/// Build a JSON response with status code.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_string(body).unwrap_or_else(|e| {
        serde_json::json!({
            "error": {
                "code": "E900",
                "message": format!("Serialization error: {}", e),
                "status": 500
            }
        })
        .to_string()
    });
    build(status, "application/json", Bytes::from(json))
}

/// Build a 200 OK JSON response.
pub fn ok<T: Serialize>(body: &T) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, body)
}

/// Build a 200 OK plain-text response.
pub fn ok_text(content_type: &'static str, text: impl Into<String>) -> Response<Full<Bytes>> {
    build(StatusCode::OK, content_type, Bytes::from(text.into()))
}

/// Build a 404 Not Found response.
pub fn not_found() -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": {
            "code": "E000",
            "message": "Not found",
            "status": 404
        }
    });
    json_response(StatusCode::NOT_FOUND, &body)
}

/// Build a 405 Method Not Allowed response.
pub fn method_not_allowed(allowed: &[&str]) -> Response<Full<Bytes>> {
    let allow = allowed.join(", ");
    let body = serde_json::json!({
        "error": {
            "code": "E000",
            "message": format!("Method not allowed. Allowed: {}", allow),
            "status": 405
        }
    });

    let mut response = json_response(StatusCode::METHOD_NOT_ALLOWED, &body);
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}
