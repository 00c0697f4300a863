//! API error types and RivuletError → HTTP status mapping.

use super::response;
use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use rivulet_core::error::RivuletError;

/// API error with HTTP status code and error code.
#[derive(Debug)]
pub struct ApiError {
    /// Error code (e.g., "E101").
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// HTTP status code.
    pub status: StatusCode,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(code: &'static str, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code,
            message: message.into(),
            status,
        }
    }

    /// Create a 400 Bad Request error.
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, StatusCode::BAD_REQUEST)
    }

    /// Create a 413 Payload Too Large error.
    pub fn payload_too_large(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, StatusCode::PAYLOAD_TOO_LARGE)
    }

    /// Create a 500 Internal Server Error.
    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(code, message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to HTTP response.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let body = serde_json::json!({
            "error": {
                "code": self.code,
                "message": self.message,
                "status": self.status.as_u16()
            }
        });
        response::json_response(self.status, &body)
    }
}

impl From<RivuletError> for ApiError {
    fn from(err: RivuletError) -> Self {
        let code = err.code();
        let message = err.to_string();

        let status = match &err {
            // 409 Conflict
            RivuletError::CyclicTopology { .. } => StatusCode::CONFLICT,

            // 400 Bad Request
            RivuletError::InvalidArgument { .. }
            | RivuletError::Configuration { .. }
            | RivuletError::UnknownAgentType { .. }
            | RivuletError::ConfigParse { .. } => StatusCode::BAD_REQUEST,

            // 500 Internal Server Error
            RivuletError::CleanupFailed { .. }
            | RivuletError::Io { .. }
            | RivuletError::Network { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            code,
            message,
            status,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyclic_topology_is_conflict() {
        let err = RivuletError::CyclicTopology {
            agents: 1,
            topics: 2,
        };
        let api_err: ApiError = err.into();

        assert_eq!(api_err.code, "E201");
        assert_eq!(api_err.status, StatusCode::CONFLICT);
    }

    #[test]
    fn configuration_errors_are_bad_request() {
        let err = RivuletError::ConfigParse {
            line: 4,
            cause: "incomplete agent record".to_string(),
        };
        let api_err: ApiError = err.into();

        assert_eq!(api_err.code, "E103");
        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn cleanup_failure_is_internal() {
        let err = RivuletError::CleanupFailed {
            agent: "inc#1".to_string(),
            topics: vec!["A".to_string()],
        };
        let api_err: ApiError = err.into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_format() {
        let err = ApiError::bad_request("E001", "topic name cannot be empty");
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
