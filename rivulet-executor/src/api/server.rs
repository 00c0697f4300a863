//! HTTP server setup and connection handling.

use super::router;
use super::state::AppState;
use crate::engine::Engine;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use rivulet_core::error::{Result, RivuletError};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Notify, Semaphore};

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Connections served at once; further clients wait in the accept queue.
    pub max_connections: usize,
}

impl ServerConfig {
    /// Create a new server configuration.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    /// Set the connection limit. Zero is treated as one.
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max.max(1);
        self
    }

    /// Get the socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        let host: std::net::IpAddr = self.host.parse().unwrap_or([0, 0, 0, 0].into());
        SocketAddr::new(host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_connections: 64,
        }
    }
}

/// Stops a running [`ApiServer`].
#[derive(Debug, Clone)]
pub struct ShutdownHandle(Arc<Notify>);

impl ShutdownHandle {
    /// Ask the server to stop accepting connections.
    ///
    /// Takes effect even if the server has not started waiting yet.
    /// Connections already being served run to completion.
    pub fn shutdown(&self) {
        self.0.notify_one();
    }
}

/// HTTP API server for an [`Engine`].
pub struct ApiServer {
    config: ServerConfig,
    state: Arc<AppState>,
    connections: Arc<Semaphore>,
    shutdown: Arc<Notify>,
}

impl ApiServer {
    /// Create a new API server.
    pub fn new(config: ServerConfig, engine: Arc<Engine>) -> Self {
        let connections = Arc::new(Semaphore::new(config.max_connections.max(1)));
        Self {
            config,
            state: Arc::new(AppState::new(engine)),
            connections,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Get a reference to the application state.
    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// A handle that stops [`ApiServer::run`] from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.shutdown))
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener> {
        TcpListener::bind(self.config.socket_addr())
            .await
            .map_err(|e| RivuletError::Io {
                path: std::path::PathBuf::from(format!(
                    "{}:{}",
                    self.config.host, self.config.port
                )),
                cause: e.to_string(),
            })
    }

    /// Bind and serve until shutdown.
    pub async fn run(&self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Serve connections from `listener` until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let local = listener
            .local_addr()
            .map_err(|e| RivuletError::Network {
                cause: e.to_string(),
            })?;

        tracing::info!(
            addr = %local,
            max_connections = self.config.max_connections,
            "API server started"
        );

        loop {
            let permit = tokio::select! {
                permit = Arc::clone(&self.connections).acquire_owned() => {
                    permit.map_err(|e| RivuletError::Network { cause: e.to_string() })?
                }
                _ = self.shutdown.notified() => break,
            };

            let (stream, remote_addr) = tokio::select! {
                result = listener.accept() => match result {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                },
                _ = self.shutdown.notified() => break,
            };

            let io = TokioIo::new(stream);
            let state = Arc::clone(&self.state);

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let state = Arc::clone(&state);
                    async move { router::route(req, state).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    if !e.is_incomplete_message() {
                        tracing::warn!(
                            remote = %remote_addr,
                            error = %e,
                            "HTTP connection error"
                        );
                    }
                }
                drop(permit);
            });
        }

        tracing::info!("API server shutting down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_connections, 64);
    }

    #[test]
    fn server_config_socket_addr() {
        let config = ServerConfig::new("127.0.0.1", 9000);
        let addr = config.socket_addr();

        assert_eq!(addr.port(), 9000);
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
    }

    #[test]
    fn zero_connections_is_one() {
        let config = ServerConfig::default().with_max_connections(0);
        assert_eq!(config.max_connections, 1);
    }

    #[tokio::test]
    async fn shutdown_before_serve_returns() {
        let server = ApiServer::new(
            ServerConfig::new("127.0.0.1", 0),
            Arc::new(Engine::new()),
        );
        let listener = server.bind().await.unwrap();
        server.shutdown_handle().shutdown();

        server.serve(listener).await.unwrap();
    }
}
