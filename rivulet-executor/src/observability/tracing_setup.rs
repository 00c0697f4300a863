//! Tracing subscriber setup with format selection.

use super::config::{LogFormat, LogTarget, TracingConfig};
use anyhow::{Context, Result};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global tracing subscriber.
///
/// An invalid filter falls back to `info`.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.log_filter()).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(format_layer(config))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        format = %config.log_format(),
        filter = %config.log_filter(),
        "Tracing initialized"
    );
    Ok(())
}

fn writer(target: LogTarget) -> BoxMakeWriter {
    match target {
        LogTarget::Stdout => BoxMakeWriter::new(std::io::stdout),
        LogTarget::Stderr => BoxMakeWriter::new(std::io::stderr),
    }
}

fn format_layer(config: &TracingConfig) -> BoxedLayer {
    let base = fmt::layer()
        .with_writer(writer(config.target()))
        .with_file(config.include_location())
        .with_line_number(config.include_location())
        .with_target(config.include_target())
        .with_thread_ids(config.include_thread_ids());

    match config.log_format() {
        LogFormat::Json => base
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .flatten_event(true)
            .boxed(),
        LogFormat::Pretty => base.pretty().boxed(),
        LogFormat::Compact => base.compact().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_build_for_every_format() {
        for format in [LogFormat::Json, LogFormat::Pretty, LogFormat::Compact] {
            let config = TracingConfig::builder().log_format(format).build();
            let _layer = format_layer(&config);
        }
    }
}
