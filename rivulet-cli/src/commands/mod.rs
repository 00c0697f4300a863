//! CLI command implementations.

pub mod graph;
pub mod run;
pub mod serve;
pub mod validate;
pub mod version;
