//! Observability infrastructure for Rivulet.
//!
//! Structured logging through `tracing`, with the subscriber selected at
//! startup:
//! - `json` - Structured JSON output (for ELK/Loki)
//! - `pretty` - Human-readable multi-line output
//! - `compact` - Compact single-line format
//!
//! # Configuration
//!
//! [`TracingConfig::from_env`] reads:
//! - `RIVULET_LOG_FORMAT` - one of the formats above
//! - `RIVULET_LOG_LEVEL` or `RUST_LOG` - filter directives
//! - `RIVULET_LOG_LOCATION` - include file and line
//! - `RIVULET_LOG_THREAD_IDS` - include thread IDs
//!
//! # Example
//!
//! ```ignore
//! use rivulet_executor::observability::{TracingConfig, init_tracing};
//!
//! init_tracing(&TracingConfig::from_env())?;
//!
//! // Or with explicit settings
//! let config = TracingConfig::builder()
//!     .json_format(true)
//!     .log_filter("debug,hyper=info")
//!     .build();
//! init_tracing(&config)?;
//! ```

mod config;
mod tracing_setup;

pub use config::{LogFormat, LogTarget, TracingConfig, TracingConfigBuilder};
pub use tracing_setup::init_tracing;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert_eq!(config.target(), LogTarget::Stderr);
    }

    #[test]
    fn test_config_builder() {
        let config = TracingConfig::builder()
            .log_format(LogFormat::Json)
            .log_filter("rivulet_core=trace")
            .include_location(true)
            .target(LogTarget::Stdout)
            .build();

        assert_eq!(config.log_format(), LogFormat::Json);
        assert_eq!(config.log_filter(), "rivulet_core=trace");
        assert!(config.include_location());
        assert!(!config.include_thread_ids());
        assert_eq!(config.target(), LogTarget::Stdout);
    }

    #[test]
    fn test_config_from_env() {
        // Missing env vars fall back to defaults
        let config = TracingConfig::from_env();
        assert!(!config.log_filter().is_empty());
    }
}
