//! Integration tests for the HTTP server over real sockets.

mod common;

use common::{SUM_CONFIG, http};
use rivulet_executor::api::{ApiServer, ServerConfig, ShutdownHandle};
use rivulet_executor::engine::Engine;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

struct TestServer {
    addr: SocketAddr,
    engine: Arc<Engine>,
    shutdown: ShutdownHandle,
    task: JoinHandle<()>,
}

impl TestServer {
    async fn start(max_connections: usize) -> Self {
        let engine = Arc::new(Engine::new());
        let config = ServerConfig::new("127.0.0.1", 0).with_max_connections(max_connections);
        let server = ApiServer::new(config, Arc::clone(&engine));
        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = server.shutdown_handle();

        let task = tokio::spawn(async move {
            server.serve(listener).await.unwrap();
        });
        Self {
            addr,
            engine,
            shutdown,
            task,
        }
    }

    async fn stop(self) {
        self.shutdown.shutdown();
        self.task.await.unwrap();
    }
}

#[tokio::test]
async fn load_publish_and_inspect() {
    let server = TestServer::start(8).await;
    let addr = server.addr;

    let response = http(addr, "POST", "/api/v1/config", SUM_CONFIG).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.json()["agents"].as_array().unwrap().len(), 4);

    let response = http(addr, "POST", "/api/v1/topics/A", "1").await;
    assert_eq!(response.status, 200);

    let response = http(addr, "GET", "/api/v1/publish?topic=C&message=10", "").await;
    assert_eq!(response.status, 200);
    assert_eq!(
        server.engine.topic_registry().get("F").unwrap().last_number(),
        Some(14.0)
    );

    let response = http(addr, "GET", "/api/v1/graph/cycles", "").await;
    assert_eq!(response.json()["acyclic"], true);

    let response = http(addr, "GET", "/api/v1/status", "").await;
    assert_eq!(response.json()["requests"]["published"], 2);

    server.stop().await;
}

#[tokio::test]
async fn plus_in_topic_path_is_literal() {
    let server = TestServer::start(8).await;
    let addr = server.addr;

    let response = http(addr, "POST", "/api/v1/config", "std::inc\na+b\nout\n").await;
    assert_eq!(response.status, 200);

    let response = http(addr, "POST", "/api/v1/topics/a+b", "1").await;
    assert_eq!(response.status, 200);
    assert_eq!(response.json()["topic"], "a+b");

    let topics = server.engine.topic_registry();
    assert_eq!(topics.lookup("out").unwrap().last_number(), Some(2.0));
    assert!(!topics.contains("a b"));

    server.stop().await;
}

#[tokio::test]
async fn connection_limit_queues_extra_clients() {
    let server = TestServer::start(1).await;
    let addr = server.addr;

    // Holds the only connection slot without sending anything.
    let idle = TcpStream::connect(addr).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Raw socket, so the first byte of the reply can be timed.
    let mut waiting = TcpStream::connect(addr).await.unwrap();
    waiting
        .write_all(b"GET /api/v1/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();

    let mut buf = [0u8; 64];
    let early = tokio::time::timeout(Duration::from_millis(200), waiting.read(&mut buf)).await;
    assert!(early.is_err(), "second client was served while the slot was taken");

    drop(idle);

    let mut raw = String::new();
    tokio::time::timeout(Duration::from_secs(5), waiting.read_to_string(&mut raw))
        .await
        .unwrap()
        .unwrap();
    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {raw}");

    server.stop().await;
}
