//! HTTP API for a running engine.
//!
//! This module exposes an [`Engine`](crate::engine::Engine) over HTTP:
//! - Configuration loading and reset
//! - Topic listing and publishing
//! - Topology snapshots and cycle checks
//! - Health and status endpoints
//!
//! # Architecture
//!
//! The API uses plain Hyper 1.x. Every route lives under `/api/v1`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      ApiServer                           │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  │
//! │  │   router     │──│   handlers   │──│    state     │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  │
//! │         │                  │                 │          │
//! │         ▼                  ▼                 ▼          │
//! │  ┌──────────────────────────────────────────────────┐  │
//! │  │                     Engine                        │  │
//! │  └──────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use rivulet_executor::api::{ApiServer, ServerConfig};
//! use rivulet_executor::engine::Engine;
//! use std::sync::Arc;
//!
//! let engine = Arc::new(Engine::new());
//! let config = ServerConfig::new("0.0.0.0", 8080);
//!
//! let server = ApiServer::new(config, engine);
//! server.run().await?;
//! ```

mod error;
pub mod handlers;
mod request;
mod response;
mod router;
mod server;
mod state;

pub use error::ApiError;
pub use router::{API_PREFIX, route};
pub use server::{ApiServer, ServerConfig, ShutdownHandle};
pub use state::AppState;
