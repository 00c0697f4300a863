//! API request handlers.

pub mod config;
pub mod graph;
pub mod health;
pub mod topics;
