//! Graph command - print the topology of a configuration.

use anyhow::{Context, Result};
use rivulet_executor::engine::Engine;
use rivulet_executor::loader::{ConfigLoader, LoaderConfig};
use rivulet_executor::topology::{GraphSnapshot, NodeKind};
use std::path::Path;

/// Output format for the graph command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable listing.
    Text,
    /// JSON snapshot.
    Json,
    /// Graphviz DOT.
    Dot,
}

/// Run the graph command.
pub fn run(file: &Path, format: Format) -> Result<()> {
    let snapshot = snapshot(file)?;
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        Format::Dot => print!("{}", snapshot.to_dot()),
        Format::Text => print!("{}", render_text(&snapshot)),
    }
    Ok(())
}

/// Build the configuration without activating it and snapshot its topology.
///
/// Cyclic configurations are built too so they can be inspected.
pub fn snapshot(file: &Path) -> Result<GraphSnapshot> {
    let definition = ConfigLoader::load_file(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;

    let engine = Engine::new().with_loader_config(LoaderConfig {
        check_cycles: false,
        strict: true,
    });
    engine.activate(definition)?;
    let snapshot = engine.snapshot();
    engine.shutdown();
    Ok(snapshot)
}

/// Render a snapshot as an indented listing.
pub fn render_text(snapshot: &GraphSnapshot) -> String {
    let mut out = String::new();
    let name_of = |id: &str| {
        snapshot
            .nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| id.to_string())
    };

    let agents: Vec<_> = snapshot
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Agent)
        .collect();
    out.push_str(&format!("Agents ({}):\n", agents.len()));
    for agent in agents {
        let inputs: Vec<_> = snapshot
            .edges
            .iter()
            .filter(|e| e.to == agent.id)
            .map(|e| name_of(&e.from))
            .collect();
        let outputs: Vec<_> = snapshot
            .edges
            .iter()
            .filter(|e| e.from == agent.id)
            .map(|e| name_of(&e.to))
            .collect();
        out.push_str(&format!(
            "  {}: [{}] -> [{}]\n",
            agent.name,
            inputs.join(", "),
            outputs.join(", ")
        ));
    }

    let topics: Vec<_> = snapshot
        .nodes
        .iter()
        .filter(|n| n.kind == NodeKind::Topic)
        .map(|n| n.name.as_str())
        .collect();
    out.push_str(&format!("Topics ({}): {}\n", topics.len(), topics.join(", ")));
    out.push_str(&format!(
        "Acyclic: {}\n",
        if snapshot.acyclic { "yes" } else { "no" }
    ));
    out
}
