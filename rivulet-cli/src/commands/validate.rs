//! Validate command - check a configuration file without running it.

use anyhow::Result;
use rivulet_agents::create_standard_registry;
use rivulet_core::registry::TopicRegistry;
use rivulet_executor::loader::{ConfigLoader, LoaderConfig};
use rivulet_executor::topology::{NodeKind, TopologyGraph};
use std::path::Path;

/// Run the validate command.
pub fn run(file: &Path) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("Configuration file not found: {}", file.display());
    }

    tracing::info!(file = %file.display(), "Validating configuration");

    let title = format!("Validation Results for: {}", file.display());
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));
    println!();

    let definition = match ConfigLoader::load_file(file) {
        Ok(def) => def,
        Err(e) => {
            println!("✗ PARSE ERROR:");
            println!("  {}", e);
            anyhow::bail!("Configuration parsing failed");
        }
    };
    println!("✓ Syntax is valid ({} agent records)", definition.len());
    println!();

    let mut has_errors = false;
    let mut has_warnings = false;

    // Extra topic names are accepted but never wired.
    let agents = create_standard_registry();
    for record in &definition.agents {
        if let Some(factory) = agents.get(&record.agent_type) {
            let info = factory.info();
            if record.inputs.len() > info.min_inputs() || record.outputs.len() > info.min_outputs()
            {
                has_warnings = true;
                println!(
                    "⚠ WARNING: line {}: {} uses only {} input(s) and {} output(s); extra names are ignored",
                    record.line,
                    record.agent_type,
                    info.min_inputs(),
                    info.min_outputs()
                );
            }
        }
    }

    // Build into a scratch registry; cycles are reported below instead of
    // failing the build.
    let topics = TopicRegistry::new();
    let loader = ConfigLoader::with_config(LoaderConfig {
        check_cycles: false,
        strict: false,
    });
    let mut loaded = loader.build(&definition, &topics, &agents)?;

    if loaded.failures.is_empty() {
        println!("✓ All agents constructed");
    } else {
        has_errors = true;
        println!("✗ Agent construction failed:");
        for failure in &loaded.failures {
            println!("  - line {}: {}", failure.line, failure.error);
        }
    }
    println!();

    let graph = TopologyGraph::from_registry(&topics);
    println!("Topology Summary:");
    println!("  Agents: {}", graph.count(NodeKind::Agent));
    println!("  Topics: {}", graph.count(NodeKind::Topic));
    println!("  Edges: {}", graph.edge_count());

    match graph.find_cycle() {
        None => {
            println!();
            println!("✓ Topology is acyclic");
        }
        Some(cycle) => {
            has_errors = true;
            println!();
            println!("✗ Topology contains a cycle:");
            println!("  {}", cycle.join(" -> "));
        }
    }

    loaded.close();

    println!();
    println!("{}", "=".repeat(title.len()));

    if has_errors {
        println!("✗ Validation FAILED");
        anyhow::bail!("Configuration validation failed");
    } else if has_warnings {
        println!("⚠ Validation passed with warnings");
    } else {
        println!("✓ Validation PASSED");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn valid_configuration_passes() {
        let f = file("std::inc\nA\nB\nstd::plus\nB,C\nD\n");
        assert!(run(f.path()).is_ok());
    }

    #[test]
    fn cyclic_configuration_fails() {
        let f = file("std::plus\nA,B\nB\n");
        assert!(run(f.path()).is_err());
    }

    #[test]
    fn unknown_agent_fails() {
        let f = file("std::nope\nA\nB\n");
        assert!(run(f.path()).is_err());
    }

    #[test]
    fn missing_file_fails() {
        assert!(run(Path::new("/nonexistent/rivulet.cfg")).is_err());
    }
}
