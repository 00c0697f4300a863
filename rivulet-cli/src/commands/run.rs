//! Run command - load a configuration and publish values through it.

use anyhow::{Context, Result};
use rivulet_executor::engine::{Engine, TopicView};
use rivulet_executor::loader::ConfigLoader;
use std::path::Path;

/// Parse a `topic=value` argument.
pub fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((topic, value)) if !topic.trim().is_empty() => {
            Ok((topic.trim().to_string(), value.to_string()))
        }
        Some(_) => Err("topic name cannot be empty".to_string()),
        None => Err(format!("expected topic=value, got '{}'", arg)),
    }
}

/// Run the run command.
pub fn run(file: &Path, publishes: &[(String, String)], json: bool) -> Result<()> {
    let definition = ConfigLoader::load_file(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    let engine = Engine::new();
    let report = engine
        .activate(definition)
        .with_context(|| format!("Failed to activate {}", file.display()))?;

    for failure in &report.failures {
        eprintln!(
            "warning: skipped {} at line {}: {}",
            failure.agent_type, failure.line, failure.error
        );
    }

    if !json {
        println!(
            "Loaded {} agent(s) on {} topic(s)",
            report.agents.len(),
            report.topics
        );
    }

    for (topic, value) in publishes {
        engine
            .publish(topic, value)
            .with_context(|| format!("Failed to publish to '{}'", topic))?;
        let topics = engine.topics();

        if json {
            let line = serde_json::json!({
                "published": { "topic": topic, "value": value },
                "topics": topics,
            });
            println!("{}", serde_json::to_string(&line)?);
        } else {
            println!();
            println!("{} <- {}", topic, value);
            print!("{}", render_values(&topics));
        }
    }

    let closed = engine.shutdown();
    tracing::debug!(closed = closed.closed, "Run finished");
    Ok(())
}

/// Render the topics that hold a value, one per line.
pub fn render_values(topics: &[TopicView]) -> String {
    let width = topics.iter().map(|t| t.name.len()).max().unwrap_or(0);
    topics
        .iter()
        .filter_map(|t| {
            t.last_value
                .as_ref()
                .map(|v| format!("  {:width$} = {}\n", t.name, v, width = width))
        })
        .collect()
}
