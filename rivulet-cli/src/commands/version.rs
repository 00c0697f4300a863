//! Version command - show version information.

use anyhow::Result;
use rivulet_agents::create_standard_registry;

/// Version information.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run the version command.
pub fn run() -> Result<()> {
    println!("Rivulet - Reactive Topic/Agent Dataflow Engine");
    println!();
    println!("Version:     {}", VERSION);
    println!(
        "Platform:    {} / {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    println!();
    println!("Components:");
    println!("  rivulet-core      Messages, topics, registry, agent trait");
    println!("  rivulet-agents    Standard agents and the agent registry");
    println!("  rivulet-executor  Topology, loader, engine, HTTP API");
    println!("  rivulet-cli       Command-line interface");
    println!();
    println!("Agent types:");
    for info in create_standard_registry().all() {
        println!("  {:<10} {}", info.agent_type, info.description);
    }

    Ok(())
}
