#![allow(clippy::module_inception)]

//! Configuration loader for building agent wirings from text.
//!
//! A configuration is a sequence of three-line records:
//!
//! ```text
//! # comment lines and blank lines are ignored
//! std::plus
//! A, B
//! C
//! ```
//!
//! The first line names the agent type, the second its comma-separated input
//! topics and the third its comma-separated output topics.
//!
//! # Example
//!
//! ```ignore
//! use rivulet_executor::loader::ConfigLoader;
//!
//! let definition = ConfigLoader::load_file("wirings/sum.conf")?;
//! let loaded = ConfigLoader::new().build(&definition, &topics, &agents)?;
//! ```

mod builder;
mod loader;

pub use builder::{AgentFailure, CloseReport, ConfigBuilder, LoadedConfig};
pub use loader::{AgentDefinition, ConfigDefinition, ConfigLoader, LoaderConfig, LoaderError};
