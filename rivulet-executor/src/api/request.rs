//! Request body and query string helpers.

use super::error::ApiError;
use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::Request;
use hyper::body::Body;
use std::collections::HashMap;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Read the whole request body as UTF-8 text.
pub async fn read_body_string<B>(req: Request<B>) -> Result<String, ApiError>
where
    B: Body<Data = Bytes>,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let body = Limited::new(req.into_body(), MAX_BODY_BYTES);
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<http_body_util::LengthLimitError>() => {
            return Err(ApiError::payload_too_large(
                "E002",
                format!("Request body exceeds {} bytes", MAX_BODY_BYTES),
            ));
        }
        Err(e) => {
            return Err(ApiError::bad_request(
                "E002",
                format!("Failed to read request body: {}", e),
            ));
        }
    };

    String::from_utf8(bytes.to_vec())
        .map_err(|_| ApiError::bad_request("E002", "Request body is not valid UTF-8"))
}

/// Decode a query string into key/value pairs.
///
/// Later duplicates win. Pairs without `=` map to an empty value.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_form(key), decode_form(value));
    }
    params
}

/// Query parameters of a request.
pub fn query_params<B>(req: &Request<B>) -> HashMap<String, String> {
    parse_query(req.uri().query().unwrap_or(""))
}

/// Percent-decode one path segment. `+` is a literal plus here.
pub fn decode_path(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Percent-decode one form-encoded query component, treating `+` as a space.
fn decode_form(component: &str) -> String {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;

    #[test]
    fn query_pairs_are_decoded() {
        let params = parse_query("topic=A%20B&message=4.5&flag");

        assert_eq!(params.get("topic").map(String::as_str), Some("A B"));
        assert_eq!(params.get("message").map(String::as_str), Some("4.5"));
        assert_eq!(params.get("flag").map(String::as_str), Some(""));
    }

    #[test]
    fn plus_is_space_in_query() {
        assert_eq!(decode_form("hello+world"), "hello world");
        assert_eq!(decode_form("a%2Bb"), "a+b");
    }

    #[test]
    fn plus_is_literal_in_path() {
        assert_eq!(decode_path("a+b"), "a+b");
        assert_eq!(decode_path("a%20b"), "a b");
        assert_eq!(decode_path("a%2Bb"), "a+b");
    }

    #[test]
    fn empty_query() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("&&").is_empty());
    }

    #[tokio::test]
    async fn body_is_read() {
        let req = Request::new(Full::new(Bytes::from("std::inc\nA\nB\n")));
        assert_eq!(read_body_string(req).await.unwrap(), "std::inc\nA\nB\n");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let req = Request::new(Full::new(Bytes::from(vec![b'a'; MAX_BODY_BYTES + 1])));
        let err = read_body_string(req).await.unwrap_err();
        assert_eq!(err.status, hyper::StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn invalid_utf8_is_rejected() {
        let req = Request::new(Full::new(Bytes::from_static(&[0xff, 0xfe])));
        let err = read_body_string(req).await.unwrap_err();
        assert_eq!(err.status, hyper::StatusCode::BAD_REQUEST);
    }
}
