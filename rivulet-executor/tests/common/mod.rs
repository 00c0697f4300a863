//! Common test utilities for integration tests.

#![allow(dead_code)]

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::Request;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::io::Write;
use std::net::SocketAddr;
use tempfile::NamedTempFile;

/// Two increments feeding a sum, then one more increment.
pub const SUM_CONFIG: &str = "\
# A -> inc -> B, C -> inc -> D, B + D -> E, E -> inc -> F
std::inc
A
B

std::inc
C
D

std::plus
B,D
E

std::inc
E
F
";

/// Plus feeding back into its own input.
pub const CYCLIC_CONFIG: &str = "std::plus\nA,B\nB\n";

/// Write `content` to a temporary configuration file.
pub fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// A collected HTTP response.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// Send one request and collect the whole response.
pub async fn http(addr: SocketAddr, method: &str, path: &str, body: &str) -> HttpResponse {
    // No idle connections, so none outlive the request and hold a server slot.
    let client = Client::builder(TokioExecutor::new())
        .pool_max_idle_per_host(0)
        .build_http();

    let req = Request::builder()
        .method(method)
        .uri(format!("http://{}{}", addr, path))
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap();

    let resp = client.request(req).await.unwrap();
    let status = resp.status().as_u16();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();

    HttpResponse {
        status,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}
